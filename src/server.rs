//! JSON-lines RPC server.
//!
//! Reads one request per line from any async reader and writes one response
//! per line, in request order. The transport is left to the caller: the CLI
//! serves stdin/stdout, tests use in-memory pipes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

use crate::api::messages::kinds;
use crate::api::{
    DeleteMixParams, DeletedCount, FindSimilarColorsParams, ListMixesParams, MediumParams,
    MixPaintsParams, Request, Response, SaveMixParams, SetBackgroundParams, SimilarColorDto,
};
use crate::assets::AssetLoader;
use crate::error::{CatalogError, ServiceError};
use crate::models::{AppConfig, PaintSetDefinition};
use crate::services::{InMemoryMixStore, MixStore, PaintCatalog, ResilientColorMixer, WorkerOptions};
use pigment_mix::{Consistency, Medium, Paint, SearchOptions};

#[derive(Debug, Error)]
enum RpcError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Unknown method {0:?}")]
    UnknownMethod(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to encode result: {0}")]
    Encode(String),
}

impl From<CatalogError> for RpcError {
    fn from(e: CatalogError) -> Self {
        RpcError::Service(e.into())
    }
}

impl RpcError {
    fn into_response(self, id: u64) -> Response {
        match self {
            RpcError::Service(e) => Response::from_service_error(id, &e),
            RpcError::InvalidParams(_) => Response::error(Some(id), kinds::INVALID_PARAMS, self.to_string()),
            RpcError::UnknownMethod(_) => Response::error(Some(id), kinds::UNKNOWN_METHOD, self.to_string()),
            RpcError::NotFound(_) => Response::error(Some(id), kinds::NOT_FOUND, self.to_string()),
            RpcError::Encode(_) => Response::error(Some(id), "internal", self.to_string()),
        }
    }
}

/// Everything a request needs: the mixer, the catalog and saved mixes.
pub struct RpcServer {
    mixer: Arc<ResilientColorMixer>,
    catalog: Arc<PaintCatalog>,
    store: Arc<dyn MixStore>,
    search_defaults: SearchOptions,
}

/// Create a server from config and catalog assets.
pub fn create_server(loader: &AssetLoader) -> anyhow::Result<RpcServer> {
    let config = AppConfig::load_from_assets(loader);
    let catalog = PaintCatalog::load_from_assets(loader)?;
    let options = WorkerOptions::from_config(config.background(), &config.worker);
    let mixer = ResilientColorMixer::spawn(options)?;

    Ok(RpcServer::new(
        Arc::new(mixer),
        Arc::new(catalog),
        Arc::new(InMemoryMixStore::new()),
        config.search.to_options(),
    ))
}

impl RpcServer {
    pub fn new(
        mixer: Arc<ResilientColorMixer>,
        catalog: Arc<PaintCatalog>,
        store: Arc<dyn MixStore>,
        search_defaults: SearchOptions,
    ) -> Self {
        Self {
            mixer,
            catalog,
            store,
            search_defaults,
        }
    }

    pub fn mixer(&self) -> &ResilientColorMixer {
        &self.mixer
    }

    pub fn catalog(&self) -> &PaintCatalog {
        &self.catalog
    }

    pub fn search_defaults(&self) -> &SearchOptions {
        &self.search_defaults
    }

    /// Serve requests until the reader is exhausted.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line).await;
            let mut encoded = serde_json::to_string(&response)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            encoded.push('\n');
            writer.write_all(encoded.as_bytes()).await?;
            writer.flush().await?;
        }
        tracing::debug!("RPC input closed");
        Ok(())
    }

    /// Answer one request line.
    pub async fn handle_line(&self, line: &str) -> Response {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                // Echo the id when the line is JSON with a usable id
                let id = serde_json::from_str::<Value>(line)
                    .ok()
                    .and_then(|v| v.get("id").and_then(Value::as_u64));
                tracing::warn!(error = %e, "Unreadable request");
                return Response::error(id, kinds::PARSE_ERROR, e.to_string());
            }
        };

        let span = tracing::info_span!("rpc", id = request.id, method = %request.method);
        self.handle(request).instrument(span).await
    }

    pub async fn handle(&self, request: Request) -> Response {
        let id = request.id;
        match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::ok(id, result),
            Err(e) => {
                tracing::debug!(id, method = %request.method, error = %e, "Request failed");
                e.into_response(id)
            }
        }
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "setPaintSet" => {
                let definition: PaintSetDefinition = parse_params(params)?;
                let paint_set = self.catalog.resolve(&definition)?;
                tracing::info!(
                    medium = %paint_set.medium(),
                    paints = paint_set.len(),
                    "Paint set selected"
                );
                self.mixer.set_paint_set(paint_set).await?;
                Ok(Value::Null)
            }
            "setBackground" => {
                let params: SetBackgroundParams = parse_params(params)?;
                self.mixer.set_background(&params.color).await?;
                Ok(Value::Null)
            }
            "findSimilarColors" => {
                let params: FindSimilarColorsParams = parse_params(params)?;
                let options = params.options(&self.search_defaults);
                let mut results = self
                    .mixer
                    .find_similar_colors(&params.target_color, params.is_glaze, options)
                    .await?;
                params.sort.sort(&mut results);
                let results: Vec<SimilarColorDto> = results.iter().map(Into::into).collect();
                encode(&results)
            }
            "mixPaints" => {
                let params: MixPaintsParams = parse_params(params)?;
                let (paints, background) = self.resolve_composition(&params).await?;
                let mixes = self
                    .mixer
                    .mix_paints(paints, params.fractions, &background)
                    .await?;
                encode(&mixes)
            }
            "saveMix" => {
                let params: SaveMixParams = parse_params(params)?;
                let (paints, background) = self.resolve_composition(&params.composition).await?;
                let mut mix = self
                    .mixer
                    .mix(
                        paints,
                        params.composition.fractions,
                        params.is_glaze,
                        params.consistency.unwrap_or(Consistency::Thick),
                        &background,
                    )
                    .await?;
                if let Some(name) = params.name {
                    mix = mix.with_name(name);
                }
                if let Some(pipet) = params.pipet {
                    mix = mix.with_pipet(pipet, params.image_file_id);
                } else {
                    mix.image_file_id = params.image_file_id;
                }
                encode(&self.store.save(mix).await?)
            }
            "listMixes" => {
                let params: ListMixesParams = parse_params(params)?;
                let medium = self.medium_or_active(params.medium).await?;
                let mut mixes = self.store.list_by_medium(medium).await?;
                params.sort.sort(&mut mixes);
                encode(&mixes)
            }
            "deleteMix" => {
                let params: DeleteMixParams = parse_params(params)?;
                if self.store.delete(&params.paint_mix_id).await? {
                    Ok(Value::Null)
                } else {
                    Err(RpcError::NotFound(format!(
                        "No saved mix with id {}",
                        params.paint_mix_id
                    )))
                }
            }
            "deleteAllMixes" => {
                let params: MediumParams = parse_params(params)?;
                let medium = self.medium_or_active(params.medium).await?;
                let deleted = self.store.delete_all_by_medium(medium).await?;
                encode(&DeletedCount { deleted })
            }
            other => Err(RpcError::UnknownMethod(other.to_string())),
        }
    }

    /// Paints of a composition and the background to mix over.
    async fn resolve_composition(
        &self,
        params: &MixPaintsParams,
    ) -> Result<(Vec<Arc<Paint>>, String), RpcError> {
        let paints = match params.medium {
            Some(medium) => self
                .catalog
                .get_all(medium, &params.paints)?
                .into_iter()
                .map(Arc::new)
                .collect(),
            None => {
                let paint_set = self.mixer.paint_set().await.ok_or_else(|| {
                    RpcError::InvalidParams(
                        "no paint set selected; give a medium to mix catalog paints".to_string(),
                    )
                })?;
                params
                    .paints
                    .iter()
                    .map(|key| {
                        paint_set.get(key).cloned().ok_or_else(|| {
                            RpcError::from(CatalogError::UnknownPaint {
                                medium: paint_set.medium(),
                                brand: key.brand.clone(),
                                id: key.id,
                            })
                        })
                    })
                    .collect::<Result<_, _>>()?
            }
        };

        let background = match &params.background {
            Some(background) => background.clone(),
            None => self.mixer.background().await,
        };
        Ok((paints, background))
    }

    async fn medium_or_active(&self, medium: Option<Medium>) -> Result<Medium, RpcError> {
        match medium {
            Some(medium) => Ok(medium),
            None => self
                .mixer
                .paint_set()
                .await
                .map(|set| set.medium())
                .ok_or_else(|| RpcError::InvalidParams("medium is required".to_string())),
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigment_mix::OFF_WHITE_HEX;
    use serde_json::json;

    fn server() -> RpcServer {
        let catalog = PaintCatalog::load_from_assets(&AssetLoader::new(None, None)).unwrap();
        let mixer = ResilientColorMixer::spawn(WorkerOptions {
            background: OFF_WHITE_HEX.parse().unwrap(),
            queue_capacity: 4,
            memo_capacity: 8,
        })
        .unwrap();
        RpcServer::new(
            Arc::new(mixer),
            Arc::new(catalog),
            Arc::new(InMemoryMixStore::new()),
            SearchOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server().handle_line(r#"{"id": 9, "method": "paint"}"#).await;
        assert_eq!(response.id, Some(9));
        assert_eq!(response.error.unwrap().kind, "unknown_method");
    }

    #[tokio::test]
    async fn test_unreadable_line_keeps_id_when_possible() {
        let server = server();
        let response = server.handle_line(r#"{"id": 4}"#).await;
        assert_eq!(response.id, Some(4));
        assert_eq!(response.error.unwrap().kind, "parse_error");

        let response = server.handle_line("not json").await;
        assert_eq!(response.id, None);
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let response = server()
            .handle(Request {
                id: 1,
                method: "setBackground".to_string(),
                params: json!({"colour": "#FFFFFF"}),
            })
            .await;
        assert_eq!(response.error.unwrap().kind, "invalid_params");
    }

    #[tokio::test]
    async fn test_mix_without_paint_set_needs_medium() {
        let server = server();
        let params = json!({"paints": [{"brand": "studio", "id": 1}], "fractions": [1]});
        let response = server
            .handle(Request {
                id: 1,
                method: "mixPaints".to_string(),
                params: params.clone(),
            })
            .await;
        assert_eq!(response.error.unwrap().kind, "invalid_params");

        let mut params = params;
        params["medium"] = json!("oil");
        let response = server
            .handle(Request {
                id: 2,
                method: "mixPaints".to_string(),
                params,
            })
            .await;
        assert!(response.is_ok());
        let mixes = response.result.unwrap();
        assert_eq!(mixes[0]["color"], json!("#FF0000"));
    }
}
