pub mod analytics;
pub mod correlation;
pub mod dataset;
pub mod export;
pub mod filters;
pub mod record;
pub mod sample_data;
pub mod selection;
pub mod similarity;
pub mod state;
