//! Analyze UseCase
//!
//! Entry points over whole functions and modules. Each function gets its own
//! explorer and store; a module's functions may be analyzed in parallel, with
//! reports kept in module order.

use crate::config::ExplorerConfig;
use crate::errors::Result;
use crate::features::path_explorer::domain::AnalysisReport;
use crate::features::path_explorer::infrastructure::PathExplorer;
use crate::features::solver::infrastructure::build_backend;
use crate::features::solver::ports::SolverBackend;
use crate::shared::models::{FunctionUnit, ModuleUnit};
use rayon::prelude::*;
use tracing::info;

/// Analyze UseCase Trait
pub trait AnalyzeUseCase: Send + Sync {
    fn analyze_function(&self, function: &FunctionUnit) -> AnalysisReport;

    fn analyze_module(&self, module: &ModuleUnit) -> Vec<AnalysisReport>;
}

/// Analyze UseCase Implementation
pub struct AnalyzeUseCaseImpl {
    config: ExplorerConfig,
    solver: Box<dyn SolverBackend>,
}

impl AnalyzeUseCaseImpl {
    /// Fails only when the configured backend is unavailable
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let solver = build_backend(&config.solver)?;
        Ok(Self { config, solver })
    }

    /// Use an explicit backend instead of the configured one
    pub fn with_solver(config: ExplorerConfig, solver: Box<dyn SolverBackend>) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }
}

impl AnalyzeUseCase for AnalyzeUseCaseImpl {
    fn analyze_function(&self, function: &FunctionUnit) -> AnalysisReport {
        let mut explorer = PathExplorer::new(self.solver.as_ref(), &self.config);
        explorer.bind_params(&function.params);
        explorer.explore(&function.body);
        let report = explorer.finish(function.name.as_str());

        info!(
            function = %report.function,
            test_cases = report.test_cases.len(),
            violations = report.violations.len(),
            diagnostics = report.diagnostics.len(),
            solver_checks = report.stats.solver_checks,
            "function analyzed"
        );
        report
    }

    fn analyze_module(&self, module: &ModuleUnit) -> Vec<AnalysisReport> {
        if self.config.parallel_functions {
            module
                .functions
                .par_iter()
                .map(|f| self.analyze_function(f))
                .collect()
        } else {
            module
                .functions
                .iter()
                .map(|f| self.analyze_function(f))
                .collect()
        }
    }
}

/// Analyze one function with the configured backend
pub fn analyze_function(function: &FunctionUnit, config: &ExplorerConfig) -> Result<AnalysisReport> {
    let usecase = AnalyzeUseCaseImpl::new(config.clone())?;
    Ok(usecase.analyze_function(function))
}

/// Analyze every function of a module, in module order
pub fn analyze_module(module: &ModuleUnit, config: &ExplorerConfig) -> Result<Vec<AnalysisReport>> {
    let usecase = AnalyzeUseCaseImpl::new(config.clone())?;
    Ok(usecase.analyze_module(module))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Expr, Param, Stmt};

    fn guarded(name: &str) -> FunctionUnit {
        FunctionUnit::new(
            name,
            vec![Param::new("a", "bool")],
            vec![Stmt::Conditional {
                line: 2,
                test: Expr::ident("a"),
                body: vec![],
                orelse: vec![],
            }],
        )
    }

    #[test]
    fn test_module_order_is_preserved() {
        let module = ModuleUnit {
            functions: (0..8).map(|i| guarded(&format!("f{}", i))).collect(),
        };

        let reports = analyze_module(&module, &ExplorerConfig::default()).unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.function.as_str()).collect();
        assert_eq!(names, vec!["f0", "f1", "f2", "f3", "f4", "f5", "f6", "f7"]);
        assert!(reports.iter().all(|r| r.test_cases.len() == 1));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let module = ModuleUnit {
            functions: vec![guarded("f"), guarded("g")],
        };
        let parallel = analyze_module(&module, &ExplorerConfig::default()).unwrap();
        let sequential = analyze_module(
            &module,
            &ExplorerConfig::default().with_parallel_functions(false),
        )
        .unwrap();
        assert_eq!(parallel, sequential);
    }
}
