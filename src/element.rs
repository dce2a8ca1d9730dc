//! Typed containers over time-ordered-data arrays, and the factories that
//! make them.
//!
//! Every array carried through the pipeline has the same three axes: time
//! (dump), frequency (channel) and receiver, in that order. An [`Element`]
//! binds that convention to a raw [`Array3`] so that subsetting and
//! reductions can never silently drop an axis.

use ndarray::prelude::*;

/// The dump (time sample) axis.
pub const TIME_AXIS: Axis = Axis(0);
/// The frequency channel axis.
pub const FREQ_AXIS: Axis = Axis(1);
/// The receiver axis.
pub const RECV_AXIS: Axis = Axis(2);

/// An immutable (time × frequency × receiver) array.
///
/// Elements are created by an [`ElementFactory`]; every "mutation" is a new
/// `Element`. Subsetting along any axis keeps the array 3-dimensional, even
/// when the subset has length 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<A> {
    array: Array3<A>,
}

impl<A: Clone> Element<A> {
    fn new(array: Array3<A>) -> Element<A> {
        Element { array }
    }

    /// (number of dumps, number of channels, number of receivers).
    pub fn shape(&self) -> (usize, usize, usize) {
        self.array.dim()
    }

    pub fn len_of(&self, axis: Axis) -> usize {
        self.array.len_of(axis)
    }

    /// The value at one (dump, channel, receiver) cell.
    pub fn value(&self, dump: usize, channel: usize, receiver: usize) -> A {
        self.array[[dump, channel, receiver]].clone()
    }

    pub fn view(&self) -> ArrayView3<'_, A> {
        self.array.view()
    }

    pub fn into_array(self) -> Array3<A> {
        self.array
    }

    /// A new element containing only the given dumps, in the given order.
    pub fn get_dumps(&self, dumps: &[usize]) -> Element<A> {
        Element::new(self.array.select(TIME_AXIS, dumps))
    }

    /// A new element containing only the given channel. The frequency axis
    /// is kept as a singleton.
    pub fn get_freq(&self, channel: usize) -> Element<A> {
        Element::new(self.array.select(FREQ_AXIS, &[channel]))
    }

    /// A new element containing only the given receiver. The receiver axis
    /// is kept as a singleton.
    pub fn get_recv(&self, receiver: usize) -> Element<A> {
        Element::new(self.array.select(RECV_AXIS, &[receiver]))
    }

    /// The (time × frequency) plane of an element whose receiver axis is a
    /// singleton.
    pub fn squeeze(&self) -> ArrayView2<'_, A> {
        assert_eq!(
            self.array.len_of(RECV_AXIS),
            1,
            "squeeze needs a singleton receiver axis"
        );
        self.array.index_axis(RECV_AXIS, 0)
    }
}

impl Element<f64> {
    /// Sum along `axis`, the reduced axis kept as a singleton.
    pub fn sum_axis(&self, axis: Axis) -> Element<f64> {
        Element::new(self.array.sum_axis(axis).insert_axis(axis))
    }

    /// Mean along `axis`, the reduced axis kept as a singleton.
    pub fn mean_axis(&self, axis: Axis) -> Element<f64> {
        let n = self.array.len_of(axis) as f64;
        Element::new((self.array.sum_axis(axis) / n).insert_axis(axis))
    }
}

impl Element<bool> {
    /// Count of set cells along `axis`, the reduced axis kept as a
    /// singleton.
    pub fn count_axis(&self, axis: Axis) -> Element<usize> {
        Element::new(
            self.array
                .mapv(|flagged| flagged as usize)
                .sum_axis(axis)
                .insert_axis(axis),
        )
    }
}

/// Creates [`Element`]s from raw arrays.
///
/// Factories do no validation of their own; a malformed array surfaces at
/// the point of use, not at construction.
pub trait ElementFactory {
    fn create<A: Clone>(&self, array: Array3<A>) -> Element<A>;
}

/// The plain factory: binds the array as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultElementFactory;

impl ElementFactory for DefaultElementFactory {
    fn create<A: Clone>(&self, array: Array3<A>) -> Element<A> {
        Element::new(array)
    }
}

/// A factory scoped to one scan state.
///
/// This decorates a [`DefaultElementFactory`] with a fixed, ordered list of
/// dump indices: `create` first subsets the incoming array to those dumps,
/// then delegates to the component factory. The caller sees data only
/// through that scan state, with no duplicated factory logic.
#[derive(Debug, Clone)]
pub struct ScanElementFactory {
    component: DefaultElementFactory,
    scan_dumps: Vec<usize>,
}

impl ScanElementFactory {
    pub fn new(scan_dumps: Vec<usize>) -> ScanElementFactory {
        ScanElementFactory {
            component: DefaultElementFactory,
            scan_dumps,
        }
    }

    /// The dump indices this factory subsets to.
    pub fn scan_dumps(&self) -> &[usize] {
        &self.scan_dumps
    }
}

impl ElementFactory for ScanElementFactory {
    fn create<A: Clone>(&self, array: Array3<A>) -> Element<A> {
        // A leading axis of length 1 is a value broadcast over time; it has
        // nothing to subset.
        let array = if array.len_of(TIME_AXIS) > 1 {
            array.select(TIME_AXIS, &self.scan_dumps)
        } else {
            array
        };
        self.component.create(array)
    }
}
