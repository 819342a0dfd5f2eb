//! Seleção de fonte – máquina de estados e reconciliação por poll.
//!
//! A cada poll a lista nova é reconciliada com a seleção anterior:
//!
//! 1. seleção ainda presente na lista → nada muda, nada é notificado;
//! 2. seleção do usuário sumiu → reavalia como se não houvesse seleção;
//! 3. lista não vazia → primeira fonte que contém o hint (case-insensitive);
//!    sem match, nenhuma fonte arbitrária é escolhida;
//! 4. lista vazia → `NoSelection` e placeholder "Scanning..." na UI.

use crate::types::{SourceList, SourceName};
use tracing::{debug, info};

/// Entrada exibida na UI quando nenhuma fonte foi descoberta.
pub const SCANNING_PLACEHOLDER: &str = "Scanning...";

/// Provedor externo de enumeração de fontes.
pub trait SourceProvider {
    fn list_sources(&mut self) -> SourceList;
}

/// Consumidor externo que troca o stream decodificado.
pub trait StreamConsumer {
    fn set_active_source(&mut self, name: &str);
}

/// UI externa que exibe a lista atual.
///
/// `entries` já contém o placeholder quando a lista está vazia.
pub trait SourceListView {
    fn show_sources(&mut self, entries: &[SourceName], selected: Option<&str>);
}

/// Estado da seleção.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    NoSelection,
    AutoSelected(SourceName),
    UserSelected(SourceName),
}

impl SelectionState {
    pub fn name(&self) -> Option<&str> {
        match self {
            SelectionState::NoSelection => None,
            SelectionState::AutoSelected(n) | SelectionState::UserSelected(n) => Some(n),
        }
    }
}

/// Máquina de estados de seleção de fonte.
#[derive(Debug, Clone)]
pub struct SourceSelector {
    state: SelectionState,
    hint: String,
}

impl SourceSelector {
    /// `hint` vazio desliga a seleção automática.
    pub fn new(hint: impl Into<String>) -> Self {
        Self {
            state: SelectionState::NoSelection,
            hint: hint.into(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Reconcilia a seleção com a lista recém-obtida.
    ///
    /// Retorna o nome a ser notificado ao consumidor, se a seleção mudou.
    pub fn reconcile(&mut self, sources: &[SourceName]) -> Option<SourceName> {
        if let Some(current) = self.state.name() {
            if sources.iter().any(|s| s == current) {
                return None;
            }
            if let SelectionState::UserSelected(gone) = &self.state {
                info!("Fonte escolhida pelo usuário sumiu: {gone}");
            }
        }

        if sources.is_empty() {
            if self.state != SelectionState::NoSelection {
                info!("Nenhuma fonte disponível, seleção descartada");
            }
            self.state = SelectionState::NoSelection;
            return None;
        }

        match self.find_hint_match(sources) {
            Some(name) => {
                info!("Fonte selecionada automaticamente: {name}");
                self.state = SelectionState::AutoSelected(name.clone());
                Some(name)
            }
            None => {
                debug!(
                    "Nenhuma fonte contém \"{}\" ({} disponíveis)",
                    self.hint,
                    sources.len()
                );
                self.state = SelectionState::NoSelection;
                None
            }
        }
    }

    /// Escolha explícita vinda da UI.
    ///
    /// O placeholder é ignorado; qualquer outro nome sobrepõe a seleção
    /// automática imediatamente.
    pub fn user_select(&mut self, name: &str) -> Option<SourceName> {
        if name == SCANNING_PLACEHOLDER {
            debug!("Placeholder selecionado, ignorando");
            return None;
        }
        info!("Fonte alterada pelo usuário: {name}");
        self.state = SelectionState::UserSelected(name.to_string());
        Some(name.to_string())
    }

    /// Um ciclo completo: poll, reconciliação, UI e notificação.
    pub fn poll(
        &mut self,
        provider: &mut dyn SourceProvider,
        consumer: &mut dyn StreamConsumer,
        view: &mut dyn SourceListView,
    ) {
        let sources = provider.list_sources();
        let changed = self.reconcile(&sources);

        if sources.is_empty() {
            view.show_sources(&[SCANNING_PLACEHOLDER.to_string()], None);
        } else {
            view.show_sources(&sources, self.state.name());
        }

        if let Some(name) = changed {
            consumer.set_active_source(&name);
        }
    }

    /// Entrega de evento da UI já encaminhando ao consumidor.
    pub fn handle_user_select(&mut self, name: &str, consumer: &mut dyn StreamConsumer) {
        if let Some(name) = self.user_select(name) {
            consumer.set_active_source(&name);
        }
    }

    /// Primeiro nome (na ordem da lista) que contém o hint.
    fn find_hint_match(&self, sources: &[SourceName]) -> Option<SourceName> {
        if self.hint.is_empty() {
            return None;
        }
        let hint = self.hint.to_lowercase();
        sources
            .iter()
            .find(|s| s.to_lowercase().contains(&hint))
            .cloned()
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
