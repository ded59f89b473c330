//! OOP Registry: annotator lists and the name → factory table
pub mod annotator_list;
pub mod annotator_registry;

pub use annotator_list::{AnnotatorEntry, AnnotatorList};
pub use annotator_registry::{AnnotatorFactory, AnnotatorRegistry};
