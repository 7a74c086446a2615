//! Reader for histograms in the HwU format
//!
//! A HwU file consists of a line naming the columns, e.g.
//! `##& xmin & xmax & central value & dy`, followed by any number of
//! `<histogram> ... <\histogram>` blocks, each containing one row of
//! numbers per bin.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::tags::{HISTOGRAM_END, HISTOGRAM_START, HWU_COLUMNS_START};

/// A histogram as a table of bins
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct Histogram {
    title: String,
    declared_bins: Option<usize>,
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// The leading columns of a histogram row
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Bin {
    pub xmin: f64,
    pub xmax: f64,
    pub value: f64,
    pub error: f64,
}

impl Histogram {
    /// Everything after the `<histogram>` tag
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The number of bins given in front of the title, if any
    pub fn declared_bins(&self) -> Option<usize> {
        self.declared_bins
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All entries in the column with the given name
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Bins made from the first four columns
    ///
    /// This is empty if there are fewer than four columns.
    pub fn bins(&self) -> impl Iterator<Item = Bin> + '_ {
        self.rows.iter().filter_map(|row| match row.as_slice() {
            &[xmin, xmax, value, error, ..] => Some(Bin {
                xmin,
                xmax,
                value,
                error,
            }),
            _ => None,
        })
    }
}

/// Read all histograms from a file
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<Histogram>, Error> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Read all histograms from a stream
pub fn parse<R: BufRead>(stream: R) -> Result<Vec<Histogram>, Error> {
    let mut histograms = Vec::new();
    let mut columns: Option<Vec<String>> = None;
    let mut current: Option<Histogram> = None;
    let mut line_number = 0;
    for line in stream.lines() {
        let line = line?;
        line_number += 1;
        let malformed = |reason| Error::MalformedHistogram {
            line_number,
            line: line.clone(),
            reason,
        };
        if line.starts_with(HWU_COLUMNS_START) {
            columns = Some(parse_columns(&line));
        } else if line.starts_with(HISTOGRAM_END) {
            let hist = current.take().ok_or_else(|| malformed("no open histogram"))?;
            histograms.push(hist);
        } else if let Some(title) = line.strip_prefix(HISTOGRAM_START) {
            if current.is_some() {
                return Err(malformed("nested histogram"));
            }
            let columns = columns
                .clone()
                .ok_or_else(|| malformed("no column names"))?;
            let title = title.trim();
            let declared_bins = title
                .split_whitespace()
                .next()
                .and_then(|n| n.parse().ok());
            current = Some(Histogram {
                title: title.to_owned(),
                declared_bins,
                columns,
                rows: Vec::new(),
            });
        } else if let Some(hist) = current.as_mut() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|entry| fast_float::parse(entry).ok())
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| malformed("non-numeric entry"))?;
            if row.len() != hist.columns.len() {
                return Err(malformed("wrong number of entries"));
            }
            hist.rows.push(row);
        }
    }
    if current.is_some() {
        return Err(Error::MalformedHistogram {
            line_number,
            line: String::new(),
            reason: "histogram without closing tag",
        });
    }
    Ok(histograms)
}

fn parse_columns(line: &str) -> Vec<String> {
    line.trim_start_matches(|c| c == '#' || c == '&' || c == ' ')
        .split('&')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}
