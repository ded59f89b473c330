//! OOP IO: the collaborators around the engine.
//!
//! Loads the parameter store, metadata, annotator list and story from disk,
//! writes the five artifacts of a run, and generates starter templates.
//!
//! # Example
//!
//! ```ignore
//! use oop_io::{load_parameter_store, read_annotator_list, DirectoryWriter, OutputWriter};
//!
//! let params = load_parameter_store(Path::new("parameterStore.properties"))?;
//! let list = read_annotator_list(Path::new("annotators.txt"))?;
//! let pipeline = registry.build_pipeline(&list, &params)?;
//! let result = pipeline.run(&text, &mut metadata)?;
//! DirectoryWriter::new("out").write(&result)?;
//! ```

pub mod config;
pub mod error;
pub mod properties;
pub mod templates;
pub mod writer;

pub use config::{load_metadata, load_parameter_store, read_annotator_list, read_text};
pub use error::IoError;
pub use properties::parse_properties;
pub use templates::generate_templates;
pub use writer::{ArtifactKind, DirectoryWriter, OutputWriter};
