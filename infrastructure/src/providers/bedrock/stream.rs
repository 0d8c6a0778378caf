//! Background task feeding ConverseStream events into a [`StreamHandle`]
//!
//! [`StreamHandle`]: relay_application::StreamHandle

use super::types;
use aws_sdk_bedrockruntime::primitives::event_stream::EventReceiver;
use aws_sdk_bedrockruntime::types::ConverseStreamOutput;
use aws_sdk_bedrockruntime::types::error::ConverseStreamOutputError;
use aws_smithy_types::error::display::DisplayErrorContext;
use relay_application::GatewayError;
use relay_application::ports::inference_gateway::FragmentResult;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Read events until the model stops, the stream fails, or the consumer
/// goes away.
pub async fn pump(
    mut events: EventReceiver<ConverseStreamOutput, ConverseStreamOutputError>,
    tx: mpsc::Sender<FragmentResult>,
) {
    let mut forwarded = 0usize;

    loop {
        match events.recv().await {
            Ok(Some(event)) => {
                let Some(fragment) = types::convert_stream_event(&event) else {
                    continue;
                };
                let is_final = fragment.is_final;
                if tx.send(Ok(fragment)).await.is_err() {
                    debug!(forwarded, "Stream consumer dropped, stopping pump");
                    return;
                }
                forwarded += 1;
                if is_final {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(forwarded, "Bedrock stream interrupted: {}", DisplayErrorContext(&e));
                let _ = tx
                    .send(Err(GatewayError::StreamInterrupted(
                        DisplayErrorContext(&e).to_string(),
                    )))
                    .await;
                return;
            }
        }
    }

    debug!(forwarded, "Bedrock stream finished");
}
