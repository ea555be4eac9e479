use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::encode::payload::MetadataPayload;
use crate::foundation::error::{DynwallError, DynwallResult};
use crate::schedule::model::{AppearanceIndex, FrameSchedule};

/// Namespace URI consumers look up the `h24` attribute under.
pub const APPLE_DESKTOP_NS: &str = "http://ns.apple.com/namespace/1.0/";

const PAYLOAD_MARKER: &str = "{payload}";
const H24_ATTR_OPEN: &str = "apple_desktop:h24='";

const XMP_TEMPLATE: &str = "<?xpacket begin='\u{feff}' id='W5M0MpCehiHzreSzNTczkc9d'?>\n\
<x:xmpmeta xmlns:x='adobe:ns:meta/'>\n  \
<rdf:RDF xmlns:rdf='http://www.w3.org/1999/02/22-rdf-syntax-ns#'>\n    \
<rdf:Description xmlns:apple_desktop='http://ns.apple.com/namespace/1.0/' apple_desktop:h24='{payload}'/>\n  \
</rdf:RDF>\n\
</x:xmpmeta>\n\
<?xpacket end='w'?>\n";

/// Wrap an ASCII base64 payload in the fixed XMP packet, UTF-8 encoded.
pub fn wrap_xmp(base64_payload: &str) -> Vec<u8> {
    XMP_TEMPLATE
        .replacen(PAYLOAD_MARKER, base64_payload, 1)
        .into_bytes()
}

/// Encode a schedule into the XMP blob attached to the container's primary image.
pub fn encode_schedule(
    schedule: &FrameSchedule,
    index: AppearanceIndex,
) -> DynwallResult<Vec<u8>> {
    let payload = MetadataPayload::from_schedule(schedule, index);
    let plist = payload.to_binary_plist()?;
    let b64 = BASE64.encode(plist);
    tracing::debug!(
        frames = payload.ti.len(),
        plist_base64_len = b64.len(),
        "encoded h24 payload"
    );
    Ok(wrap_xmp(&b64))
}

/// Extract and decode the `h24` payload from an XMP packet.
pub fn decode_metadata(xmp: &[u8]) -> DynwallResult<MetadataPayload> {
    let text = std::str::from_utf8(xmp)
        .map_err(|e| DynwallError::metadata(format!("XMP packet is not UTF-8: {e}")))?;
    if !text.contains(APPLE_DESKTOP_NS) {
        return Err(DynwallError::metadata(
            "XMP packet does not declare the apple_desktop namespace",
        ));
    }

    let start = text
        .find(H24_ATTR_OPEN)
        .map(|i| i + H24_ATTR_OPEN.len())
        .ok_or_else(|| DynwallError::metadata("XMP packet has no apple_desktop:h24 attribute"))?;
    let len = text[start..]
        .find('\'')
        .ok_or_else(|| DynwallError::metadata("unterminated apple_desktop:h24 attribute"))?;

    let plist = BASE64
        .decode(&text[start..start + len])
        .map_err(|e| DynwallError::metadata(format!("decode h24 base64: {e}")))?;
    MetadataPayload::from_plist_bytes(&plist)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/xmp.rs"]
mod tests;
