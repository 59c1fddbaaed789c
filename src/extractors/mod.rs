// Build-file extraction
//
// Extractors scan files produced by the upstream code generator and pull out
// the values needed to build the generated project with CMake.

pub mod makefile;

pub use makefile::{MakefileError, Makefile, MandatoryField, SOURCE_EXTENSION};
