//! chainscrape-node — node-facing collaborators for the scrape loop.

pub mod dispatcher;
pub mod estimator;
pub mod rpc;
pub mod staging;

pub use dispatcher::ProcessDispatcher;
pub use estimator::NodeProgressEstimator;
pub use rpc::{ChainHeadClient, HttpHeadClient};
pub use staging::StagingFolder;
