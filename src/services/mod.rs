pub mod brand_resolver;
pub mod classifier;
pub mod dictionary;
pub mod logger;
pub mod normalizer;
