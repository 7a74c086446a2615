use std::f64::consts::PI;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, SingularKinematics};
use crate::vector::{unit, FourMomentum, ThreeVector};

/// A particle read from one line of an event block
///
/// All fields are fixed at construction, with the exception of the decay
/// vertex which can be overridden with [Particle::set_decay_vertex].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct Particle {
    pdg: i32,
    status: i32,
    mothers: [i32; 2],
    colour: [i32; 2],
    momentum: FourMomentum,
    mass: f64,
    ctau: f64,
    helicity: Option<f64>,
    vertex_override: Option<ThreeVector>,
}

impl Particle {
    pub fn new(pdg: i32, status: i32, momentum: FourMomentum, mass: f64, ctau: f64) -> Self {
        Self {
            pdg,
            status,
            mothers: [0, 0],
            colour: [0, 0],
            momentum,
            mass,
            ctau,
            helicity: None,
            vertex_override: None,
        }
    }

    /// Parse a particle line
    ///
    /// The expected columns are
    /// `pdg status mother1 mother2 colour1 colour2 px py pz E M ctau [helicity]`.
    /// `line_number` only serves to locate errors.
    ///
    /// # Example
    ///
    /// ```rust
    /// let line = "11 1 1 2 0 0 3.0 4.0 0.0 5.0 0.0 0.0 -1.0";
    /// let electron = lhekin::Particle::parse(line, 1).unwrap();
    /// assert_eq!(electron.pt(), 5.0);
    /// ```
    pub fn parse(line: &str, line_number: usize) -> Result<Self, Error> {
        let entries: Vec<&str> = line.split_whitespace().collect();
        let malformed = |field: &'static str| Error::MalformedParticleRecord {
            line_number,
            line: line.to_owned(),
            field,
        };
        let int = |idx: usize, field: &'static str| {
            entries
                .get(idx)
                .and_then(|s| s.parse::<i32>().ok())
                .ok_or_else(|| malformed(field))
        };
        let float = |idx: usize, field: &'static str| {
            entries
                .get(idx)
                .and_then(|s| fast_float::parse::<f64, _>(*s).ok())
                .ok_or_else(|| malformed(field))
        };
        let pdg = int(0, "pdg")?;
        let status = int(1, "status")?;
        let mothers = [int(2, "mother 1")?, int(3, "mother 2")?];
        let colour = [int(4, "colour 1")?, int(5, "colour 2")?];
        let px = float(6, "px")?;
        let py = float(7, "py")?;
        let pz = float(8, "pz")?;
        let e = float(9, "E")?;
        let mass = float(10, "M")?;
        let ctau = float(11, "ctau")?;
        let helicity = match entries.get(12) {
            Some(_) => Some(float(12, "helicity")?),
            None => None,
        };
        Ok(Self {
            pdg,
            status,
            mothers,
            colour,
            momentum: FourMomentum::new(e, px, py, pz),
            mass,
            ctau,
            helicity,
            vertex_override: None,
        })
    }

    pub fn pdg(&self) -> i32 {
        self.pdg
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    /// Indices of the mother particles, starting at 1
    pub fn mothers(&self) -> [i32; 2] {
        self.mothers
    }

    /// Colour flow tags
    pub fn colour(&self) -> [i32; 2] {
        self.colour
    }

    pub fn px(&self) -> f64 {
        self.momentum.px()
    }

    pub fn py(&self) -> f64 {
        self.momentum.py()
    }

    pub fn pz(&self) -> f64 {
        self.momentum.pz()
    }

    pub fn e(&self) -> f64 {
        self.momentum.e()
    }

    /// Rest mass
    pub fn m(&self) -> f64 {
        self.mass
    }

    /// Proper decay length
    pub fn ctau(&self) -> f64 {
        self.ctau
    }

    pub fn helicity(&self) -> Option<f64> {
        self.helicity
    }

    pub fn momentum(&self) -> FourMomentum {
        self.momentum
    }

    pub fn momentum3(&self) -> ThreeVector {
        self.momentum.spatial()
    }

    /// Magnitude of the three-momentum
    pub fn p3(&self) -> f64 {
        (self.px().powi(2) + self.py().powi(2) + self.pz().powi(2)).sqrt()
    }

    /// Transverse momentum
    pub fn pt(&self) -> f64 {
        (self.px().powi(2) + self.py().powi(2)).sqrt()
    }

    /// Transverse energy √(M² + pT²)
    pub fn et(&self) -> f64 {
        (self.mass.powi(2) + self.pt().powi(2)).sqrt()
    }

    /// Rapidity ½ ln((E + pz)/(E − pz))
    ///
    /// Fails whenever the argument of the logarithm is not a finite
    /// positive number, most notably for massless particles along the
    /// beam axis where E = pz.
    pub fn rapidity(&self) -> Result<f64, SingularKinematics> {
        let (energy, pz) = (self.e(), self.pz());
        let ratio = (energy + pz) / (energy - pz);
        if !(ratio.is_finite() && ratio > 0.) {
            return Err(SingularKinematics::Rapidity { energy, pz });
        }
        Ok(0.5 * ratio.ln())
    }

    /// Pseudorapidity ½ ln((|p| + pz)/(|p| − pz))
    ///
    /// Same failure conditions as [Particle::rapidity], with |p| in
    /// place of E.
    pub fn eta(&self) -> Result<f64, SingularKinematics> {
        let (p3, pz) = (self.p3(), self.pz());
        let ratio = (p3 + pz) / (p3 - pz);
        if !(ratio.is_finite() && ratio > 0.) {
            return Err(SingularKinematics::PseudoRapidity { p3, pz });
        }
        Ok(0.5 * ratio.ln())
    }

    /// Velocity β = |p|/E
    pub fn beta(&self) -> Result<f64, SingularKinematics> {
        let beta = self.p3() / self.e();
        if !beta.is_finite() {
            return Err(SingularKinematics::ZeroEnergy);
        }
        Ok(beta)
    }

    /// Lorentz factor γ = 1/√(1 − β²)
    ///
    /// Massless particles, and massive ones where rounding pushes β to
    /// one, yield [SingularKinematics::Superluminal].
    pub fn gamma(&self) -> Result<f64, SingularKinematics> {
        let beta = self.beta()?;
        if beta * beta >= 1. {
            return Err(SingularKinematics::Superluminal { beta });
        }
        Ok(1. / (1. - beta * beta).sqrt())
    }

    /// Polar angle
    pub fn theta(&self) -> f64 {
        self.pt().atan2(self.pz())
    }

    /// Azimuthal angle in (−π, π]
    pub fn phi(&self) -> f64 {
        self.py().atan2(self.px())
    }

    /// Angular separation √(Δη² + Δφ²)
    ///
    /// Δφ is taken as is, without mapping it back into (−π, π]. Two
    /// particles on either side of the φ = ±π cut therefore appear far
    /// apart. Use [Particle::delta_r_periodic] to account for the
    /// periodicity.
    pub fn delta_r(&self, other: &Particle) -> Result<f64, SingularKinematics> {
        let deta = self.eta()? - other.eta()?;
        let dphi = self.phi() - other.phi();
        Ok((deta.powi(2) + dphi.powi(2)).sqrt())
    }

    /// Angular separation with Δφ reduced into [−π, π)
    pub fn delta_r_periodic(&self, other: &Particle) -> Result<f64, SingularKinematics> {
        let deta = self.eta()? - other.eta()?;
        let dphi = (self.phi() - other.phi() + PI).rem_euclid(2. * PI) - PI;
        Ok((deta.powi(2) + dphi.powi(2)).sqrt())
    }

    /// Displacement of the decay vertex
    ///
    /// Unless overridden, this is cτ times the direction of the
    /// three-momentum, which is undefined for particles at rest.
    pub fn decay_vertex(&self) -> Result<ThreeVector, SingularKinematics> {
        match self.vertex_override {
            Some(vertex) => Ok(vertex),
            None => Ok(self.ctau * unit(&self.momentum3())?),
        }
    }

    /// Override the decay vertex, e.g. with a propagated position
    pub fn set_decay_vertex(&mut self, vertex: ThreeVector) {
        self.vertex_override = Some(vertex)
    }

    /// Go back to the decay vertex derived from cτ and the momentum
    pub fn reset_decay_vertex(&mut self) {
        self.vertex_override = None
    }

    pub fn is_pdg(&self, pdg: i32) -> bool {
        self.pdg == pdg
    }

    /// Whether any of `particles` has the same pdg code
    pub fn is_in<'a, I>(&self, particles: I) -> bool
    where
        I: IntoIterator<Item = &'a Particle>,
    {
        particles.into_iter().any(|p| p.pdg == self.pdg)
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = ryu::Buffer::new();
        writeln!(f, "Particle information:")?;
        writeln!(f, "pdg: {}", self.pdg)?;
        writeln!(f, "status: {}", self.status)?;
        let fields = [
            ("px", self.px()),
            ("py", self.py()),
            ("pz", self.pz()),
            ("E", self.e()),
            ("M", self.mass),
            ("ctau", self.ctau),
        ];
        for (name, value) in fields {
            writeln!(f, "{}: {}", name, buf.format(value))?;
        }
        if let Some(helicity) = self.helicity {
            writeln!(f, "helicity: {}", buf.format(helicity))?;
        }
        Ok(())
    }
}
