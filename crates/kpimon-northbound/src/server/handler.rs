//! NBI connection handler
//!
//! Each connection carries newline-delimited JSON requests; every request
//! line is answered with one response line.

use anyhow::Result;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LinesCodec};

use kpimon_core::nbi::{NbiRequest, NbiResponse};
use kpimon_core::ServiceDescriptor;

/// Longest request line accepted before the connection is dropped
const MAX_REQUEST_LINE: usize = 64 * 1024;

/// Serve one client until it disconnects
pub(crate) async fn handle_client<S>(stream: S, services: &[ServiceDescriptor]) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_REQUEST_LINE));

    while let Some(line) = framed.next().await {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<NbiRequest>(trimmed) {
            Ok(request) => handle_request(request, services),
            Err(e) => NbiResponse::Error {
                message: format!("Invalid request: {}", e),
            },
        };

        framed.send(serde_json::to_string(&response)?).await?;
    }

    Ok(())
}

/// Answer a single request against the registered services
pub(crate) fn handle_request(request: NbiRequest, services: &[ServiceDescriptor]) -> NbiResponse {
    match request {
        NbiRequest::Ping => NbiResponse::Pong,

        NbiRequest::ListServices => NbiResponse::Services {
            services: services.to_vec(),
        },

        NbiRequest::GetModel { model_type } => services
            .iter()
            .map(ServiceDescriptor::model)
            .find(|model| model.model_type == model_type)
            .map(|model| NbiResponse::Model(model.clone()))
            .unwrap_or_else(|| NbiResponse::Error {
                message: format!("No service serves model {}", model_type),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpimon_core::{ModelInfo, ModelType};

    fn ric_service() -> ServiceDescriptor {
        ServiceDescriptor::Gnmi(ModelInfo::new(ModelType::Ric, "1.0.0"))
    }

    #[test]
    fn test_ping() {
        assert!(matches!(
            handle_request(NbiRequest::Ping, &[]),
            NbiResponse::Pong
        ));
    }

    #[test]
    fn test_get_model_found() {
        let response = handle_request(
            NbiRequest::GetModel {
                model_type: ModelType::Ric,
            },
            &[ric_service()],
        );
        match response {
            NbiResponse::Model(model) => assert_eq!(model.version, "1.0.0"),
            other => panic!("Expected model, got {:?}", other),
        }
    }

    #[test]
    fn test_get_model_without_services() {
        let response = handle_request(
            NbiRequest::GetModel {
                model_type: ModelType::Ric,
            },
            &[],
        );
        assert!(matches!(response, NbiResponse::Error { .. }));
    }

    #[tokio::test]
    async fn test_handle_client_over_duplex() {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

        let (client, server) = tokio::io::duplex(4096);
        let services = vec![ric_service()];
        let serving = tokio::spawn(async move { handle_client(server, &services).await });

        let (reader, mut writer) = tokio::io::split(client);
        let mut reader = BufReader::new(reader);

        writer
            .write_all(b"\n{\"type\":\"list_services\"}\nnonsense\n")
            .await
            .unwrap();

        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        let response: NbiResponse = serde_json::from_str(&line).unwrap();
        assert!(matches!(response, NbiResponse::Services { services } if services.len() == 1));

        line.clear();
        reader.read_line(&mut line).await.unwrap();
        let response: NbiResponse = serde_json::from_str(&line).unwrap();
        assert!(matches!(response, NbiResponse::Error { .. }));

        drop(writer);
        drop(reader);
        serving.await.unwrap().unwrap();
    }
}
