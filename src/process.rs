use std::cell::OnceCell;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;
use crate::reader::{Reader, ReaderOptions};

/// A collection of events stored in a file
///
/// The events are never kept in memory. Every call to
/// [Process::events] reads the file again from the start.
///
/// The number of events and the cross section are computed on first
/// access and cached afterwards. Changes to the file after that point
/// go unnoticed.
#[derive(Debug)]
pub struct Process {
    path: PathBuf,
    options: ReaderOptions,
    num_events: OnceCell<usize>,
    cross_section: OnceCell<f64>,
}

impl Process {
    /// Recognised file extensions
    pub const SUPPORTED_FORMATS: [&'static str; 1] = ["lhe"];

    /// Bind to an event file
    ///
    /// The file itself is only opened when the events are read.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// let process = lhekin::Process::open("events.lhe").unwrap();
    /// println!("{} events", process.num_events().unwrap());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_owned();
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_owned();
        if !Self::SUPPORTED_FORMATS.contains(&extension.as_str()) {
            return Err(Error::UnsupportedFormat { path, extension });
        }
        Ok(Self {
            path,
            options: ReaderOptions::default(),
            num_events: OnceCell::new(),
            cross_section: OnceCell::new(),
        })
    }

    /// Change the reader configuration
    ///
    /// This discards previously computed aggregates.
    pub fn with_options(self, options: ReaderOptions) -> Self {
        Self {
            path: self.path,
            options,
            num_events: OnceCell::new(),
            cross_section: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    /// Read the events from the start of the file
    ///
    /// The file is closed when the returned reader is dropped.
    pub fn events(&self) -> Result<Reader<BufReader<File>>, Error> {
        debug!("Reading events from {}", self.path.display());
        let file = File::open(&self.path)?;
        Ok(Reader::with_options(BufReader::new(file), self.options))
    }

    /// Total number of events
    ///
    /// Fails with the first error encountered while reading.
    pub fn num_events(&self) -> Result<usize, Error> {
        if let Some(num_events) = self.num_events.get() {
            return Ok(*num_events);
        }
        let mut num_events = 0;
        for event in self.events()? {
            event?;
            num_events += 1;
        }
        Ok(*self.num_events.get_or_init(|| num_events))
    }

    /// Total cross section as the sum of all event weights
    ///
    /// This is only correct if the weights are normalised such that
    /// they add up to the cross section, which is not checked.
    /// Fails with the first error encountered while reading.
    pub fn cross_section(&self) -> Result<f64, Error> {
        if let Some(xs) = self.cross_section.get() {
            return Ok(*xs);
        }
        warn!(
            "The cross section is computed assuming that the event weights \
             are normalised to the total cross section"
        );
        let mut xs = 0.;
        for event in self.events()? {
            xs += event?.weight();
        }
        Ok(*self.cross_section.get_or_init(|| xs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Truncation;

    #[test]
    fn unsupported_format() {
        for path in ["events.hepmc", "events", "events.LHE.gz"] {
            match Process::open(path) {
                Err(Error::UnsupportedFormat { path: p, extension }) => {
                    assert_eq!(p, Path::new(path));
                    assert_eq!(extension, Path::new(path).extension().map_or("", |e| e.to_str().unwrap()));
                }
                res => panic!("Unexpected result {:?}", res),
            }
        }
    }

    #[test]
    fn missing_file() {
        let process = Process::open("test_data/does_not_exist.lhe").unwrap();
        assert!(matches!(process.events(), Err(Error::Io(_))));
        assert!(matches!(process.num_events(), Err(Error::Io(_))));
    }

    #[test]
    fn options() {
        let options = ReaderOptions {
            truncation: Truncation::Ignore,
        };
        let process = Process::open("test_data/two_events.lhe")
            .unwrap()
            .with_options(options);
        assert_eq!(process.options(), options);
        assert_eq!(process.path(), Path::new("test_data/two_events.lhe"));
    }
}
