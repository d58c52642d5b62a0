use genesis_core::settings::{model_label, validate_server_url};
use genesis_core::ProviderConfig;
use genesis_suggest::OllamaClient;

use crate::{Notice, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Untested,
    Testing,
    Succeeded,
    Failed,
}

/// Provider settings form. Enabling is only saved after a successful
/// connection test of the exact url/model pair being saved.
#[derive(Debug)]
pub struct SettingsPanel {
    draft: ProviderConfig,
    status: ConnectionStatus,
    client: OllamaClient,
}

impl SettingsPanel {
    pub fn new(ws: &Workspace) -> Self {
        Self::with_client(ws, OllamaClient::new())
    }

    pub fn with_client(ws: &Workspace, client: OllamaClient) -> Self {
        Self {
            draft: ws.provider().clone(),
            status: ConnectionStatus::Untested,
            client,
        }
    }

    pub fn draft(&self) -> &ProviderConfig {
        &self.draft
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn model_label(&self) -> &str {
        model_label(&self.draft.model)
    }

    pub fn set_server_url(&mut self, url: &str) {
        if self.draft.server_url != url {
            self.draft.server_url = url.to_string();
            self.status = ConnectionStatus::Untested;
        }
    }

    pub fn set_model(&mut self, model: &str) {
        if self.draft.model != model {
            self.draft.model = model.to_string();
            self.status = ConnectionStatus::Untested;
        }
    }

    /// The toggle itself is free; the policy is applied by [`Self::save`].
    pub fn set_enabled(&mut self, enabled: bool) {
        self.draft.enabled = enabled;
    }

    pub fn can_enable(&self) -> bool {
        self.status == ConnectionStatus::Succeeded
    }

    pub async fn test_connection(&mut self) -> Notice {
        if let Err(e) = validate_server_url(&self.draft.server_url) {
            self.status = ConnectionStatus::Failed;
            return Notice::error(e.to_string());
        }
        self.status = ConnectionStatus::Testing;
        let ok = self.client.check_connection(&self.draft).await;
        if ok {
            self.status = ConnectionStatus::Succeeded;
            Notice::success("Successfully connected to Ollama server")
        } else {
            self.status = ConnectionStatus::Failed;
            Notice::error("Failed to connect to Ollama server")
        }
    }

    pub fn save(&mut self, ws: &mut Workspace) -> Notice {
        if self.draft.enabled && !self.can_enable() {
            return Notice::warning("Please test the connection before saving enabled settings");
        }
        match ws.set_provider(self.draft.clone()) {
            Ok(()) => Notice::success("Ollama settings saved successfully"),
            Err(e) => {
                tracing::warn!(error = %e, "saving provider settings failed");
                Notice::error(format!("Failed to save Ollama settings: {e}"))
            }
        }
    }

    /// Throw away edits and reload from the workspace.
    pub fn reset(&mut self, ws: &Workspace) {
        self.draft = ws.provider().clone();
        self.status = ConnectionStatus::Untested;
    }
}
