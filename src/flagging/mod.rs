//! Post-processing of RFI (radio-frequency-interference) masks.
//!
//! An upstream detection stage produces a candidate boolean mask over
//! (time × frequency × 1), derived from an initial seed mask. The
//! post-processor refines the candidate: morphological dilation of the
//! newly found flags, closing of the whole mask, and flagging of dumps
//! whose spectrum is mostly bad already.

pub mod morphology;

use log::debug;
use ndarray::prelude::*;

use crate::element::{DefaultElementFactory, Element, ElementFactory, FREQ_AXIS, RECV_AXIS};

/// Dilation of newly found flags is applied this many times.
const DILATION_ITERATIONS: usize = 2;
/// Closing of the mask is applied this many times.
const CLOSING_ITERATIONS: usize = 5;

/// Refines an RFI mask in steps. Each step replaces the held mask with a
/// freshly created [`Element`]; nothing aliases the pre-step array. The
/// refined mask comes back out of [`RfiPostProcess::get_flag`] or
/// [`RfiPostProcess::into_flag`].
pub struct RfiPostProcess {
    flag: Element<bool>,
    initial_flag: Element<bool>,
    structure: Array2<bool>,
    factory: DefaultElementFactory,
}

impl RfiPostProcess {
    /// `new_flag` is the candidate mask, `initial_flag` the seed it was
    /// derived from; both have shape (time, frequency, 1). `struct_size`
    /// is the (time, frequency) extent of the structuring element used by
    /// all morphological steps.
    pub fn new(
        new_flag: Element<bool>,
        initial_flag: Element<bool>,
        struct_size: (usize, usize),
    ) -> RfiPostProcess {
        let structure = morphology::structuring_element(struct_size.0, struct_size.1);
        RfiPostProcess {
            flag: new_flag,
            initial_flag,
            structure,
            factory: DefaultElementFactory,
        }
    }

    /// The mask in its current state of refinement.
    pub fn get_flag(&self) -> &Element<bool> {
        &self.flag
    }

    pub fn into_flag(self) -> Element<bool> {
        self.flag
    }

    /// Restores the singleton receiver axis; the at-rest mask shape is
    /// always (time, frequency, 1).
    fn replace_flag(&mut self, plane: Array2<bool>) {
        self.flag = self.factory.create(plane.insert_axis(RECV_AXIS));
    }

    /// Grows the newly found flags, i.e. the cells where the mask differs
    /// from the seed, by two dilation steps, and folds
    /// the growth back into the mask. Seeded flags are left untouched by
    /// the growth, so pre-existing flagged regions cannot expand without
    /// new detections next to them. If the mask equals the seed, nothing
    /// changes.
    pub fn binary_mask_dilation(&mut self) {
        let current = self.flag.squeeze();
        let newly_flagged = &current ^ &self.initial_flag.squeeze();
        let dilated = morphology::binary_dilation(
            newly_flagged.view(),
            self.structure.view(),
            DILATION_ITERATIONS,
        );
        let combined = &current | &dilated;
        self.replace_flag(combined);
    }

    /// Closes the mask (five dilations, then five erosions), filling small
    /// pinholes so downstream consumers don't see fragmented flag regions.
    pub fn binary_mask_closing(&mut self) {
        let closed = morphology::binary_closing(
            self.flag.squeeze(),
            self.structure.view(),
            CLOSING_ITERATIONS,
        );
        self.replace_flag(closed);
    }

    /// Flags the full spectrum of every dump whose flagged-channel
    /// fraction strictly exceeds `channel_flag_threshold` (a probability
    /// in [0, 1]): if most of the band is bad at some time, the whole band
    /// is treated as bad (broadband interference, system fault).
    pub fn flag_all_channels(&mut self, channel_flag_threshold: f64) {
        let num_channels = self.flag.len_of(FREQ_AXIS);
        let flag_counts = self.flag.count_axis(FREQ_AXIS);
        let mut plane = self.flag.squeeze().to_owned();
        let mut num_flagged_dumps = 0;
        for (dump, mut channels) in plane.outer_iter_mut().enumerate() {
            let flagged_fraction = flag_counts.value(dump, 0, 0) as f64 / num_channels as f64;
            // Strict comparison, no epsilon: a dump sitting exactly at the
            // threshold is left alone.
            if flagged_fraction > channel_flag_threshold {
                channels.fill(true);
                num_flagged_dumps += 1;
            }
        }
        debug!("Flagged all channels of {num_flagged_dumps} dumps");
        self.replace_flag(plane);
    }
}
