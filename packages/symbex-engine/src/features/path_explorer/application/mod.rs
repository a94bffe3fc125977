//! Path Explorer Application Layer

pub mod analyze_usecase;

pub use analyze_usecase::{
    analyze_function, analyze_module, AnalyzeUseCase, AnalyzeUseCaseImpl,
};
