//! Tag spans of Chinese text with administrative-region codes.
//!
//! The [`Gazetteer`] maps place names to province/city/district units, the
//! [`Resolver`] picks one code per name using the publisher's origin and what
//! the document has already confirmed, and the [`Tagger`] scans sentences
//! longest-window-first, keeping claimed spans in an [`IntervalTree`] so that
//! matches never overlap.

pub mod config;
pub mod error;
pub mod gazetteer;
pub mod interval;
pub mod interval_tree;
pub mod news;
pub mod newspapers;
pub mod resolver;
pub mod text;
pub mod tokenizer;

pub use config::TaggerConfig;
pub use error::{Error, Result};
pub use gazetteer::{Gazetteer, Unit};
pub use geo_tagger_types::{MatchRecord, RegionNode, TaggedRecord};
pub use interval::Interval;
pub use interval_tree::IntervalTree;
pub use news::{NewsRecord, OutputFormat, Pipeline};
pub use newspapers::NewspaperList;
pub use resolver::{RecognitionContext, Resolver};
pub use tokenizer::{Match, SentenceMatch, Tagger};
