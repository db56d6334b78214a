pub mod bayes;
pub mod dataset;
pub mod grouping;
pub mod trainer;
pub mod vectorizer;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn get_version() -> &'static str {
    VERSION
}
