//! Loop de descoberta – dirige o [`SourceSelector`] numa única thread.
//!
//! Cada ciclo faz um poll e depois espera o resto do intervalo no canal de
//! eventos. Essa espera é o único ponto de suspensão: eventos da UI são
//! processados aqui mesmo, na mesma thread, então o estado de seleção não
//! precisa de lock.

use crate::selector::{SourceListView, SourceProvider, SourceSelector, StreamConsumer};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use std::time::{Duration, Instant};
use tracing::info;

/// Eventos entregues ao loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    UserSelect(String),
    Stop,
}

/// Handle para enviar eventos ao loop a partir de outras threads.
#[derive(Debug, Clone)]
pub struct SelectorHandle {
    tx: Sender<SelectorEvent>,
}

impl SelectorHandle {
    /// Retorna `false` se o loop já terminou.
    pub fn user_select(&self, name: impl Into<String>) -> bool {
        self.tx.send(SelectorEvent::UserSelect(name.into())).is_ok()
    }

    pub fn stop(&self) -> bool {
        self.tx.send(SelectorEvent::Stop).is_ok()
    }
}

/// Loop periódico de poll.
pub struct SelectorLoop<P, C, V> {
    selector: SourceSelector,
    provider: P,
    consumer: C,
    view: V,
    interval: Duration,
    rx: Receiver<SelectorEvent>,
}

impl<P, C, V> SelectorLoop<P, C, V>
where
    P: SourceProvider,
    C: StreamConsumer,
    V: SourceListView,
{
    pub fn new(
        selector: SourceSelector,
        provider: P,
        consumer: C,
        view: V,
        interval: Duration,
    ) -> (Self, SelectorHandle) {
        let (tx, rx) = unbounded();
        let this = Self {
            selector,
            provider,
            consumer,
            view,
            interval,
            rx,
        };
        (this, SelectorHandle { tx })
    }

    /// Roda até receber [`SelectorEvent::Stop`] ou até todos os handles
    /// serem descartados. Retorna as partes para inspeção.
    pub fn run(mut self) -> (SourceSelector, P, C, V) {
        info!(
            "Descoberta iniciada (hint \"{}\", intervalo {:.1}s)",
            self.selector.hint(),
            self.interval.as_secs_f64()
        );

        'outer: loop {
            self.selector
                .poll(&mut self.provider, &mut self.consumer, &mut self.view);

            let deadline = Instant::now() + self.interval;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match self.rx.recv_timeout(remaining) {
                    Ok(SelectorEvent::UserSelect(name)) => {
                        self.selector.handle_user_select(&name, &mut self.consumer);
                    }
                    Ok(SelectorEvent::Stop) | Err(RecvTimeoutError::Disconnected) => {
                        break 'outer;
                    }
                    Err(RecvTimeoutError::Timeout) => break,
                }
            }
        }

        info!("Descoberta encerrada");
        (self.selector, self.provider, self.consumer, self.view)
    }
}
