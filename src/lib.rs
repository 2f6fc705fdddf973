#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use mapkit_model as model;
pub use mapkit_store as store;
pub use mapkit_utils as utils;
