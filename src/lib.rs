//! Stream events from Les Houches Event files and compute particle
//! kinematics
//!
//! ```rust,no_run
//! let process = lhekin::Process::open("events.lhe").unwrap();
//! for event in process.events().unwrap() {
//!     let event = event.unwrap();
//!     for particle in event.final_states() {
//!         println!("{} {}", particle.pdg(), particle.pt());
//!     }
//! }
//! ```
pub mod error;
pub mod event;
pub mod hwu;
pub mod particle;
pub mod process;
pub mod reader;
pub mod status;
mod tags;
pub mod vector;

pub use error::*;
pub use event::*;
pub use particle::*;
pub use process::*;
pub use reader::*;
pub use vector::*;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn read_process() {
        let process = Process::open("test_data/two_events.lhe").unwrap();
        assert_eq!(process.num_events().unwrap(), 2);
        assert_relative_eq!(process.cross_section().unwrap(), 0.3, epsilon = 1e-12);

        let events: Vec<_> = process.events().unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first.weight(), 0.5);
        assert_eq!(first.tot_particles(), 5);
        assert_eq!(first.particles().len(), 5);
        assert_eq!(first.initial_states().count(), 2);
        assert_eq!(first.final_states().count(), 2);
        assert_eq!(first.weights().len(), 2);
        assert_eq!(first.weights()[1].id.as_deref(), Some("1002"));
        assert_eq!(first.weights()[1].value, 0.48);

        let electron = first.highest_pt(11).unwrap();
        assert_eq!(electron.pt(), 5.);
        assert_eq!(electron.p3(), 5.);
        assert_eq!(electron.et(), 5.);
        assert_relative_eq!(electron.theta(), std::f64::consts::FRAC_PI_2);
        for p in first.particles() {
            assert_relative_eq!(p.momentum().m2(), p.m().powi(2), epsilon = 1e-9);
        }

        let second = &events[1];
        assert_eq!(second.weight(), -0.2);
        assert_eq!(second.title(), Some("second event"));
        assert!(second.weights().is_empty());
        let tau = second.highest_pt(15).unwrap();
        let vertex = tau.decay_vertex().unwrap();
        assert_relative_eq!(vertex.y(), 0.3);
        assert_relative_eq!(vertex.z(), 0.4);
        assert_relative_eq!(tau.gamma().unwrap(), 13. / 12.);
    }

    #[test]
    fn deterministic() {
        let process = Process::open("test_data/two_events.lhe").unwrap();
        let again = Process::open("test_data/two_events.lhe").unwrap();
        assert_eq!(process.num_events().unwrap(), again.num_events().unwrap());
        assert_eq!(
            process.cross_section().unwrap(),
            again.cross_section().unwrap()
        );
        // cached values agree with a fresh traversal
        assert_eq!(process.num_events().unwrap(), process.events().unwrap().count());
    }

    #[test]
    fn partition_invariant() {
        let process = Process::open("test_data/two_events.lhe").unwrap();
        for event in process.events().unwrap() {
            let event = event.unwrap();
            let partitioned = event.initial_states().count() + event.final_states().count();
            let all_in_or_out = event
                .particles()
                .iter()
                .all(|p| p.status() == status::INCOMING || p.status() == status::OUTGOING);
            assert!(partitioned <= event.particles().len());
            assert_eq!(partitioned == event.particles().len(), all_in_or_out);
        }
    }

    #[test]
    fn override_vertex() {
        let process = Process::open("test_data/two_events.lhe").unwrap();
        let mut event = process.events().unwrap().next().unwrap().unwrap();
        let z = &mut event.particles_mut()[2];
        assert_eq!(z.pdg(), 23);
        assert!(z.decay_vertex().is_err());
        z.set_decay_vertex(ThreeVector::new(0., 0., 1.));
        assert_eq!(event.particles()[2].decay_vertex(), Ok(ThreeVector::new(0., 0., 1.)));
    }

    #[test]
    fn truncated() {
        let process = Process::open("test_data/truncated.lhe").unwrap();
        match process.num_events() {
            Err(Error::StreamTruncated { .. }) => {}
            res => panic!("Unexpected result {:?}", res),
        }
        assert!(matches!(
            process.cross_section(),
            Err(Error::StreamTruncated { .. })
        ));

        let mut events = process.events().unwrap();
        assert!(events.next().unwrap().is_ok());
        assert!(events.next().unwrap().is_err());
        assert!(events.next().is_none());
        assert!(matches!(events.stream_end(), Some(StreamEnd::Truncated { .. })));

        let lenient = process.with_options(ReaderOptions {
            truncation: Truncation::Ignore,
        });
        assert_eq!(lenient.num_events().unwrap(), 1);
        assert_eq!(lenient.cross_section().unwrap(), 0.5);
    }

    #[test]
    fn histograms() {
        let histograms = hwu::read("test_data/example.HwU").unwrap();
        assert_eq!(histograms.len(), 2);
        assert_eq!(histograms[0].declared_bins(), Some(4));
        let xsec: f64 = histograms[0].bins().map(|bin| bin.value * (bin.xmax - bin.xmin)).sum();
        assert_relative_eq!(xsec, 24., epsilon = 1e-9);
    }
}
