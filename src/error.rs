use crate::{
    batch::BatchError, case::CaseError, chart::ChartError, dataset::DatasetError,
    norms::NormsError, series::SeriesError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `dataset` module")]
    Dataset(#[from] DatasetError),
    #[error("Error in the `series` module")]
    Series(#[from] SeriesError),
    #[error("Error in the `chart` module")]
    Chart(#[from] ChartError),
    #[error("Error in the `batch` module")]
    Batch(#[from] BatchError),
    #[error("Error in the `norms` module")]
    Norms(#[from] NormsError),
    #[error("Error in the `case` module")]
    Case(#[from] CaseError),
}
