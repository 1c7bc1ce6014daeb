//! Delivery acknowledgment request construction

use contracts::{DeviceRequest, Format, Message};

/// Build the acknowledgment for a received message.
///
/// The ack travels back to the device, so source and destination swap. It
/// keeps the routing and correlation fields of the original and carries no
/// payload, status or spans.
pub fn ack_request(received: &Message) -> DeviceRequest {
    let ack = Message {
        message_type: received.message_type,
        source: received.destination.clone(),
        destination: received.source.clone(),
        transaction_uuid: received.transaction_uuid.clone(),
        content_type: received.content_type.clone(),
        headers: received.headers.clone(),
        metadata: received.metadata.clone(),
        path: received.path.clone(),
        service_name: received.service_name.clone(),
        url: received.url.clone(),
        partner_ids: received.partner_ids.clone(),
        session_id: received.session_id.clone(),
        quality_of_service: received.quality_of_service,
        ..Message::default()
    };

    DeviceRequest {
        message: ack,
        format: Format::Msgpack,
    }
}
