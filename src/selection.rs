//! Selecting correlator products out of the archive's full product list.

use itertools::Itertools;
use log::trace;
use thiserror::Error;

use crate::receiver::Receiver;

/// A correlator product: an ordered pair of receiver names whose
/// cross-correlation is recorded, e.g. `("m000h", "m000h")`.
pub type CorrelatorProduct = (String, String);

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error(
        "Requested correlator product(s) not in the archive: {}",
        .missing.iter().map(|(a, b)| format!("({a}, {b})")).join(", ")
    )]
    MissingProducts { missing: Vec<CorrelatorProduct> },
}

/// The auto-correlation products of `receivers`, in receiver order.
pub fn correlator_products(receivers: &[Receiver]) -> Vec<CorrelatorProduct> {
    receivers
        .iter()
        .map(|receiver| (receiver.name(), receiver.name()))
        .collect()
}

/// The position of each requested product in the archive's full product
/// list, in request order (not archive order).
///
/// If any requested product is absent this fails, naming every missing
/// product; a partial index list is never returned.
pub fn correlator_products_indices(
    all_products: &[CorrelatorProduct],
    requested: &[CorrelatorProduct],
) -> Result<Vec<usize>, SelectionError> {
    let mut indices = Vec::with_capacity(requested.len());
    let mut missing = vec![];
    for product in requested {
        match all_products.iter().position(|p| p == product) {
            Some(i) => indices.push(i),
            None => missing.push(product.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(SelectionError::MissingProducts { missing });
    }
    trace!("Correlator product indices: {indices:?}");
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver::Polarisation;

    fn products(names: &[&str]) -> Vec<CorrelatorProduct> {
        names
            .iter()
            .map(|name| (name.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn test_correlator_products() {
        let receivers = [
            Receiver::new(0, Polarisation::H),
            Receiver::new(63, Polarisation::V),
        ];
        assert_eq!(
            correlator_products(&receivers),
            vec![
                ("m000h".to_string(), "m000h".to_string()),
                ("m063v".to_string(), "m063v".to_string()),
            ]
        );
    }

    #[test]
    fn test_indices_follow_request_order() {
        let all = products(&["a", "b", "c", "d"]);
        let requested = products(&["c", "a"]);
        assert_eq!(
            correlator_products_indices(&all, &requested).unwrap(),
            vec![2, 0]
        );
    }

    #[test]
    fn test_all_requested_missing() {
        let all = products(&["a", "b", "c", "d"]);
        let requested = products(&["e", "f"]);
        assert!(correlator_products_indices(&all, &requested).is_err());
    }

    #[test]
    fn test_one_requested_missing_fails_outright() {
        let all = products(&["a", "b", "c", "d"]);
        let requested = products(&["a", "f"]);
        let err = correlator_products_indices(&all, &requested).unwrap_err();
        let SelectionError::MissingProducts { missing } = err;
        assert_eq!(missing, products(&["f"]));
    }

    #[test]
    fn test_error_names_the_missing_products() {
        let all = products(&["a"]);
        let requested = products(&["e", "f"]);
        let err = correlator_products_indices(&all, &requested).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("(e, e)"));
        assert!(message.contains("(f, f)"));
    }
}
