//! Quality-control core for MeerKAT single-dish time-ordered data.
//!
//! The archive loader (external to this crate) produces an [`ObsContext`]:
//! per-dump metadata, the receivers that were selected, and the scan
//! segmentation of the timeline. From there, [`scans::ScanStateIndices`]
//! partitions the dumps by telescope scan state,
//! [`element::ScanElementFactory`] views any array through one state, and
//! [`flagging::RfiPostProcess`] refines RFI masks before they are handed to
//! reporting collaborators.

pub mod element;
pub mod error;
pub mod flagging;
pub mod receiver;
pub mod scans;
pub mod selection;

use hifitime::{Duration, Epoch};
use log::info;
use vec1::Vec1;

pub use element::{DefaultElementFactory, Element, ElementFactory, ScanElementFactory};
pub use error::TodError;
pub use flagging::RfiPostProcess;
pub use receiver::{Polarisation, Receiver};
pub use scans::{ScanState, ScanStateIndices, ScanTuple};
pub use selection::{correlator_products, correlator_products_indices, CorrelatorProduct};

/// Everything the core consumes from one loaded observation.
///
/// The arrays follow the canonical (time × frequency × receiver) axis
/// convention of [`Element`]; quantities without a frequency or receiver
/// dependence keep the corresponding axis as a singleton.
pub struct ObsContext {
    /// The timestamp of every dump, ascending.
    pub timestamps: Vec1<Epoch>,

    /// The time between consecutive dumps.
    pub dump_period: Duration,

    /// The centre frequencies of all channels \[Hz\].
    pub fine_chan_freqs: Vec1<u64>,

    /// The receivers the raw data was subset to, in the order of the
    /// receiver axis.
    pub receivers: Vec1<Receiver>,

    /// Pointing azimuth per (dump, receiver) \[degrees\]; shape
    /// (time, 1, receiver).
    pub azimuth: Element<f64>,

    /// Pointing elevation per (dump, receiver) \[degrees\]; shape
    /// (time, 1, receiver).
    pub elevation: Element<f64>,

    /// Pointing right ascension per (dump, receiver) \[degrees\]; shape
    /// (time, 1, receiver).
    pub right_ascension: Element<f64>,

    /// Pointing declination per (dump, receiver) \[degrees\]; shape
    /// (time, 1, receiver).
    pub declination: Element<f64>,

    /// Ambient temperature per dump \[°C\]; shape (time, 1, 1).
    pub temperature: Element<f64>,

    /// Relative humidity per dump \[%\]; shape (time, 1, 1).
    pub humidity: Element<f64>,

    /// Barometric pressure per dump \[hPa\]; shape (time, 1, 1).
    pub pressure: Element<f64>,

    /// The archive's segmentation of the timeline, in time order.
    pub scan_tuples: Vec1<ScanTuple>,

    /// Dump indices per scan state, built once from `scan_tuples`.
    scan_state_indices: ScanStateIndices,
}

impl ObsContext {
    /// Builds the observation context. The per-scan-state dump indices are
    /// computed here, eagerly and exactly once.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamps: Vec1<Epoch>,
        dump_period: Duration,
        fine_chan_freqs: Vec1<u64>,
        receivers: Vec1<Receiver>,
        azimuth: Element<f64>,
        elevation: Element<f64>,
        right_ascension: Element<f64>,
        declination: Element<f64>,
        temperature: Element<f64>,
        humidity: Element<f64>,
        pressure: Element<f64>,
        scan_tuples: Vec1<ScanTuple>,
    ) -> ObsContext {
        let scan_state_indices = ScanStateIndices::new(&scan_tuples);
        info!(
            "Indexed {} dumps over {} scans",
            timestamps.len(),
            scan_tuples.len()
        );
        ObsContext {
            timestamps,
            dump_period,
            fine_chan_freqs,
            receivers,
            azimuth,
            elevation,
            right_ascension,
            declination,
            temperature,
            humidity,
            pressure,
            scan_tuples,
            scan_state_indices,
        }
    }

    pub fn num_dumps(&self) -> usize {
        self.timestamps.len()
    }

    pub fn scan_state_indices(&self) -> &ScanStateIndices {
        &self.scan_state_indices
    }

    /// The dump indices belonging to `state`.
    pub fn scan_dumps(&self, state: ScanState) -> &[usize] {
        self.scan_state_indices.dumps(state)
    }

    /// A factory that views any array through `state` only.
    pub fn scan_factory(&self, state: ScanState) -> ScanElementFactory {
        self.scan_state_indices.factory(state)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    fn context() -> ObsContext {
        let num_dumps = 6;
        let timestamps = Vec1::try_from_vec(
            (0..num_dumps)
                .map(|dump| Epoch::from_gpst_seconds(1356998400.0 + 2.0 * dump as f64))
                .collect(),
        )
        .unwrap();
        let receivers = vec1::vec1![
            Receiver::new(0, Polarisation::H),
            Receiver::new(0, Polarisation::V),
        ];
        let factory = DefaultElementFactory;
        let pointing = |offset: f64| {
            factory.create(Array3::from_shape_fn((num_dumps, 1, 2), |(t, _, r)| {
                offset + t as f64 + r as f64
            }))
        };
        let environment =
            |value: f64| factory.create(Array3::from_elem((num_dumps, 1, 1), value));
        let scan_tuples = vec1::vec1![
            ScanTuple {
                dumps: vec![0, 1],
                state: ScanState::Slew,
                index: 0,
                target: "J1939-6342".to_string(),
            },
            ScanTuple {
                dumps: vec![2, 3, 4, 5],
                state: ScanState::Scan,
                index: 1,
                target: "MeerKLASS field".to_string(),
            },
        ];
        ObsContext::new(
            timestamps,
            Duration::from_seconds(2.0),
            Vec1::try_from_vec((0u64..4).map(|c| 856_000_000 + c * 208_984).collect()).unwrap(),
            receivers,
            pointing(0.0),
            pointing(40.0),
            pointing(120.0),
            pointing(-30.0),
            environment(15.0),
            environment(30.0),
            environment(900.0),
            scan_tuples,
        )
    }

    #[test]
    fn test_scan_dumps() {
        let context = context();
        assert_eq!(context.num_dumps(), 6);
        assert_eq!(context.scan_dumps(ScanState::Slew), &[0, 1]);
        assert_eq!(context.scan_dumps(ScanState::Scan), &[2, 3, 4, 5]);
        assert!(context.scan_dumps(ScanState::Track).is_empty());
    }

    #[test]
    fn test_scan_factory_views_metadata_through_one_state() {
        let context = context();
        let factory = context.scan_factory(ScanState::Scan);
        let scan_elevation = factory.create(context.elevation.view().to_owned());
        assert_eq!(scan_elevation.shape(), (4, 1, 2));
        assert_eq!(scan_elevation.value(0, 0, 0), context.elevation.value(2, 0, 0));
    }
}
