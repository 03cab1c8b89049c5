//! Batch tagging of newspaper articles read from CSV.
//!
//! Each row is one record: column 0 is the record id, column 1 the newspaper
//! name, and the last column the article body (HTML allowed).

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use geo_tagger_types::{MatchRecord, TaggedRecord};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::TaggerConfig;
use crate::error::{Error, Result};
use crate::newspapers::{NewspaperList, is_traditional_script};
use crate::text::{split_sentences, strip_markup, to_simplified};
use crate::tokenizer::Tagger;

/// Fewest columns a row needs: id, newspaper, body.
const MIN_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRecord {
    pub id: String,
    pub newspaper: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `id name,code:CODE name,code:CODE ` per line
    #[default]
    Text,
    /// One JSON object per line
    Jsonl,
}

// ── Input ────────────────────────────────────────────────────────────────

/// Stream the usable rows of `reader`. Short rows are skipped with a warning.
pub fn records<R: Read>(reader: R, has_headers: bool) -> impl Iterator<Item = Result<NewsRecord>> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .enumerate()
        .filter_map(|(row, result)| match result {
            Err(e) => Some(Err(e.into())),
            Ok(fields) if fields.len() < MIN_COLUMNS => {
                warn!(row, columns = fields.len(), "skipping short row");
                None
            }
            Ok(fields) => Some(Ok(NewsRecord {
                id: fields[0].to_string(),
                newspaper: fields[1].to_string(),
                body: fields[fields.len() - 1].to_string(),
            })),
        })
}

/// The CSV files to process: `path` itself, or every `*.csv` below it in
/// path order when it is a directory.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let p = entry.path();
        if entry.file_type().is_file() && p.extension().and_then(|e| e.to_str()) == Some("csv") {
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

// ── Pipeline ─────────────────────────────────────────────────────────────

/// Strips, splits and tags records, one recognition context per record.
pub struct Pipeline<'a> {
    tagger: Tagger<'a>,
    newspapers: &'a NewspaperList,
    delimiters: Vec<char>,
}

impl<'a> Pipeline<'a> {
    pub fn new(tagger: Tagger<'a>, newspapers: &'a NewspaperList, config: &TaggerConfig) -> Self {
        Pipeline {
            tagger,
            newspapers,
            delimiters: config.sentence_delimiters.clone(),
        }
    }

    pub fn tag_record(&self, record: &NewsRecord) -> TaggedRecord {
        let origin = self.newspapers.origin_for(&record.newspaper);
        let mut body = strip_markup(&record.body);
        match origin {
            None => warn!(
                id = %record.id,
                newspaper = %record.newspaper,
                "no origin code, origin preference disabled"
            ),
            Some(code) if is_traditional_script(code) => {
                debug!(id = %record.id, origin = code, "converting to simplified script");
                body = to_simplified(&body);
            }
            Some(_) => {}
        }

        let sentences = split_sentences(&body, &self.delimiters);
        let found = self.tagger.tag_document(sentences.iter().copied(), origin);

        TaggedRecord {
            id: record.id.clone(),
            newspaper: record.newspaper.clone(),
            origin: origin.map(str::to_string),
            matches: found.into_iter().map(MatchRecord::from).collect(),
        }
    }

    /// Tag every record from `reader` and write results to `out`.
    /// Returns the number of records written.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: R,
        has_headers: bool,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<usize> {
        let mut n = 0;
        for record in records(reader, has_headers) {
            write_record(out, &self.tag_record(&record?), format)?;
            n += 1;
        }
        Ok(n)
    }

    /// Run over a file or a directory of CSV files.
    pub fn run_path<W: Write>(
        &self,
        input: &Path,
        has_headers: bool,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<usize> {
        let mut total = 0;
        for path in collect_inputs(input)? {
            let file = File::open(&path).map_err(|e| Error::open(&path, e))?;
            let n = self.run(file, has_headers, format, out)?;
            info!(path = %path.display(), records = n, "tagged");
            total += n;
        }
        Ok(total)
    }
}

pub fn write_record<W: Write>(out: &mut W, record: &TaggedRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", record.to_line())?,
        OutputFormat::Jsonl => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
