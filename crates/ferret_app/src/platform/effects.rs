use anyhow::Context;
use ferret_core::{Effect, Msg};
use ferret_engine::{EngineHandle, EngineSettings, Message, MessageKind};
use ferret_logging::{ferret_debug, ferret_info, ferret_warn};

use super::ui::render::PageRenderer;

/// Carries out the effects produced by `update` and turns engine output back
/// into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(settings).context("starting transfer engine")?;
        Ok(Self { engine })
    }

    pub fn apply(&self, effects: Vec<Effect>, renderer: &mut dyn PageRenderer) {
        for effect in effects {
            match effect {
                Effect::Fetch { request_id, url } => {
                    ferret_info!("Fetch request_id={} url={}", request_id, url);
                    self.engine.fetch(request_id, url);
                }
                Effect::Download {
                    request_id,
                    url,
                    local_path,
                } => {
                    ferret_info!(
                        "Download request_id={} url={} to {}",
                        request_id,
                        url,
                        local_path.display()
                    );
                    self.engine.download(request_id, url, local_path);
                }
                Effect::NodesReady { request_id, nodes } => {
                    ferret_debug!("{} nodes for request_id={}", nodes.len(), request_id);
                    renderer.on_nodes_ready(request_id, nodes);
                }
                Effect::ShowError {
                    request_id,
                    message,
                } => {
                    ferret_warn!("Request {} failed: {}", request_id, message);
                    renderer.on_error(request_id, &message);
                }
                Effect::Notice(message) => renderer.on_notice(&message),
            }
        }
    }

    /// Engine messages since the last call, as navigation messages.
    pub fn drain(&self) -> Vec<Msg> {
        self.engine.drain().into_iter().map(to_msg).collect()
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

fn to_msg(message: Message) -> Msg {
    let request_id = message.request_id;
    match message.kind {
        MessageKind::Data(bytes) => Msg::Data {
            request_id,
            bytes: bytes.to_vec(),
        },
        MessageKind::Error(message) => Msg::TransferFailed {
            request_id,
            message,
        },
        MessageKind::Finished => Msg::TransferFinished { request_id },
    }
}
