use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::particle::Particle;
use crate::status::State;
use crate::tags::{COMMENT_START, MARKUP_START};

pub type XmlAttr = HashMap<String, String>;

/// Auxiliary event weight from a `<wgt>` entry
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct Weight {
    /// Value of the `id` attribute, if any
    pub id: Option<String>,
    pub value: f64,
}

/// A scattering event
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct Event {
    tot_particles: usize,
    process_id: Option<i32>,
    weight: f64,
    scale: Option<f64>,
    alpha_qed: Option<f64>,
    alpha_qcd: Option<f64>,
    weights: Vec<Weight>,
    title: Option<String>,
    attr: XmlAttr,
    particles: Vec<Particle>,
    info: String,
}

/// Raw content collected between `<event>` and `</event>`
#[derive(Debug, Default)]
pub(crate) struct EventBlock {
    /// Line number of `lines[0]`
    pub(crate) first_line: usize,
    pub(crate) lines: Vec<String>,
    pub(crate) title: Option<String>,
    pub(crate) attr: XmlAttr,
    pub(crate) weights: Vec<Weight>,
    /// First error encountered while collecting the block
    pub(crate) error: Option<Error>,
}

impl Event {
    /// Parse the text between the `<event>` and `</event>` tags
    ///
    /// # Example
    ///
    /// ```rust
    /// let event = lhekin::Event::parse(
    ///     "2 1 0.5 91.188 0.0075 0.118
    ///      11 1 0 0 0 0 3 4 0 5 0 0
    ///      -11 1 0 0 0 0 -3 -4 0 5 0 0"
    /// ).unwrap();
    /// assert_eq!(event.weight(), 0.5);
    /// assert_eq!(event.final_states().count(), 2);
    /// ```
    pub fn parse(text: &str) -> Result<Self, Error> {
        let block = EventBlock {
            first_line: 1,
            lines: text.lines().map(str::to_owned).collect(),
            ..Default::default()
        };
        Self::from_block(block)
    }

    /// Declared number of particles
    ///
    /// This is the number given in the event header and is not checked
    /// against the number of particles actually found.
    pub fn tot_particles(&self) -> usize {
        self.tot_particles
    }

    pub fn process_id(&self) -> Option<i32> {
        self.process_id
    }

    /// Generator event weight
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Event scale in GeV
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// Value of the QED coupling α
    pub fn alpha_qed(&self) -> Option<f64> {
        self.alpha_qed
    }

    /// Value of the QCD coupling α_s
    pub fn alpha_qcd(&self) -> Option<f64> {
        self.alpha_qcd
    }

    /// Auxiliary weights in the order they appear in the event
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Text following the opening `<event>` tag on the same line
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Attributes in the `<event>` tag
    pub fn attr(&self) -> &XmlAttr {
        &self.attr
    }

    /// Trailing content after the particle lines, e.g. `<mgrwt>` blocks
    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles, e.g. to override decay vertices
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Particles with status −1
    pub fn initial_states(&self) -> impl Iterator<Item = &Particle> {
        self.particles_in(State::Initial)
    }

    /// Particles with status 1
    pub fn final_states(&self) -> impl Iterator<Item = &Particle> {
        self.particles_in(State::Final)
    }

    fn particles_in(&self, state: State) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(move |p| State::from(p.status()) == state)
    }

    /// The final-state particle with the given pdg code and the largest
    /// transverse momentum
    ///
    /// Of several particles with the same transverse momentum the first
    /// one is returned.
    pub fn highest_pt(&self, pdg: i32) -> Option<&Particle> {
        self.final_states()
            .filter(|p| p.is_pdg(pdg))
            .min_by(|a, b| b.pt().total_cmp(&a.pt()))
    }
}

fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_float(text: &str) -> Option<f64> {
    fast_float::parse(text).ok()
}

impl Event {
    pub(crate) fn from_block(block: EventBlock) -> Result<Self, Error> {
        if let Some(err) = block.error {
            return Err(err);
        }
        let first_line = block.first_line;
        let mut lines = block
            .lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (first_line + idx, line.as_str()))
            .skip_while(|(_, line)| line.trim().is_empty());

        let (header_line, header) = lines.next().ok_or_else(|| Error::MalformedEventHeader {
            line_number: first_line,
            line: String::new(),
        })?;
        let malformed_header = || Error::MalformedEventHeader {
            line_number: header_line,
            line: header.to_owned(),
        };
        let mut entries = header.split_whitespace();
        let (tot_particles, process_id, weight) =
            entries.next_tuple().ok_or_else(malformed_header)?;
        let tot_particles = tot_particles
            .parse::<usize>()
            .map_err(|_| malformed_header())?;
        let weight = parse_float(weight).ok_or_else(malformed_header)?;
        let process_id = process_id.parse().ok();
        let scale = entries.next().and_then(parse_float);
        let alpha_qed = entries.next().and_then(parse_float);
        let alpha_qcd = entries.next().and_then(parse_float);

        let mut particles = Vec::new();
        let mut info = Vec::new();
        for (line_number, line) in lines {
            let trimmed = line.trim_start();
            if !info.is_empty() || trimmed.starts_with(MARKUP_START) {
                info.push(line);
                continue;
            }
            if trimmed.starts_with(COMMENT_START) {
                continue;
            }
            match trimmed.split_whitespace().next() {
                Some(token) if is_integer(token) => {
                    particles.push(Particle::parse(line, line_number)?)
                }
                _ => {}
            }
        }

        Ok(Event {
            tot_particles,
            process_id,
            weight,
            scale,
            alpha_qed,
            alpha_qcd,
            weights: block.weights,
            title: block.title,
            attr: block.attr,
            particles,
            info: info.join("\n"),
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Event weight: {}", ryu::Buffer::new().format(self.weight))?;
        writeln!(f, "Total number of particles: {}", self.tot_particles)?;
        write!(f, "{}", self.particles.iter().format("\n"))
    }
}
