#[cfg(unix)]
use tokio::signal::unix::signal;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    OsSigQuit,
    OsSigTerm,
    UserInt,
}

#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    #[must_use]
    pub const fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    /// Tell every loop to shut down.
    ///
    /// # Errors
    ///
    /// Fails if nothing is listening for the interrupt anymore.
    pub fn terminate(&mut self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }
}

#[cfg(unix)]
async fn terminate_by_signal(mut terminator: Terminator) -> anyhow::Result<()> {
    use tokio::signal::unix::SignalKind;

    let mut interrupt_signal = signal(SignalKind::interrupt())?;
    let mut term_signal = signal(SignalKind::terminate())?;
    let mut quit_signal = signal(SignalKind::quit())?;

    let interrupted = tokio::select! {
        _ = interrupt_signal.recv() => Interrupted::OsSigInt,
        _ = term_signal.recv() => Interrupted::OsSigTerm,
        _ = quit_signal.recv() => Interrupted::OsSigQuit,
    };
    terminator.terminate(interrupted)
}

#[cfg(not(unix))]
async fn terminate_by_signal(mut terminator: Terminator) -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    terminator.terminate(Interrupted::OsSigInt)
}

/// Create the broadcast channel every loop listens on for the shutdown signal.
#[allow(clippy::module_name_repetitions)]
#[must_use]
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    let signal_terminator = terminator.clone();
    tokio::spawn(async move {
        if let Err(e) = terminate_by_signal(signal_terminator).await {
            log::error!("signal handler stopped: {e}");
        }
    });

    (terminator, rx)
}
