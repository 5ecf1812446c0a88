use crate::error::RetimeError;
use crate::locator::locate;
use crate::rescaler::Rescaler;

use log::{debug, warn};

/// The rescaled document and what was done to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retimed {
    pub text: Vec<u8>,
    pub count: usize,
    pub out_of_range: usize,
}

/// Rescales every timestamp in `document`, copying every other byte through
/// untouched. Nothing is returned unless every timestamp could be rescaled.
pub fn process(document: &[u8], rescaler: &Rescaler) -> Result<Retimed, RetimeError> {
    let mut text = Vec::with_capacity(document.len());
    let mut copied_up_to = 0;
    let mut count = 0;
    let mut out_of_range = 0;

    for found in locate(document) {
        let found = found?;
        let original = &document[found.start..found.end];

        if found.timestamp.has_out_of_range_fields() {
            warn!(
                "Timestamp '{}' at byte {} has minutes or seconds above 59; rescaling it as written",
                String::from_utf8_lossy(original),
                found.start
            );
            out_of_range += 1;
        }

        let rescaled = rescaler.rescale(&found.timestamp)?;
        text.extend_from_slice(&document[copied_up_to..found.start]);
        if rescaler.is_identity() {
            // Equal rates must reproduce the input exactly, even for
            // timestamps that would render differently.
            text.extend_from_slice(original);
        } else {
            debug!("{} -> {}", String::from_utf8_lossy(original), rescaled);
            text.extend_from_slice(rescaled.to_string().as_bytes());
        }
        copied_up_to = found.end;
        count += 1;
    }
    text.extend_from_slice(&document[copied_up_to..]);

    Ok(Retimed {
        text,
        count,
        out_of_range,
    })
}
