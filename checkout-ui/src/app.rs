//! The terminal driver: owns the store, the shell and the mounted screen,
//! turns line commands into screen calls, and feeds async results back in
//! through a channel.

use std::sync::Arc;

use checkout_core::{
    CatalogService, CheckoutStep, Product, PurchaseOutcome, PurchaseService, ServiceError,
    StoreError, WizardStore,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::command::{self, Command};
use crate::logging;
use crate::screens::{
    ActiveScreen, ConfirmationScreen, FormScreen, ProductScreen, PurchaseStatus, ScopeToken,
    ScreenOutcome, StepForm,
};
use crate::shell::{NavigationShell, path_for, resolve};
use crate::status_bar::{build_status_bar, hints_for};

const RULE: &str = "----------------------------------------";

/// Result of async work, tagged with the mount that started it.
#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded {
        token: ScopeToken,
        result: Result<Vec<Product>, ServiceError>,
    },
    PurchaseFinished {
        token: ScopeToken,
        result: Result<PurchaseOutcome, ServiceError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct CheckoutApp {
    store: WizardStore,
    shell: NavigationShell,
    screen: ActiveScreen,
    catalog: Arc<dyn CatalogService>,
    purchases: Arc<dyn PurchaseService>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    notice: Option<String>,
    show_help: bool,
}

impl CheckoutApp {
    /// Mounts the first screen, reopening the saved step if there is one.
    /// Must be called from within a Tokio runtime.
    pub fn start(
        store: WizardStore,
        catalog: Arc<dyn CatalogService>,
        purchases: Arc<dyn PurchaseService>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            store,
            shell: NavigationShell::new(),
            screen: ActiveScreen::Product(ProductScreen::new()),
            catalog,
            purchases,
            events_tx,
            events_rx,
            notice: None,
            show_help: false,
        };
        let first = app
            .shell
            .restore_saved_step(app.store.state())
            .unwrap_or(CheckoutStep::Product);
        app.mount(first);
        app
    }

    pub fn store(&self) -> &WizardStore {
        &self.store
    }

    pub fn screen(&self) -> &ActiveScreen {
        &self.screen
    }

    pub fn shell(&self) -> &NavigationShell {
        &self.shell
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(
        &mut self,
        notice: impl Into<String>,
    ) {
        self.notice = Some(notice.into());
    }

    /// Runs one command against the shell or the mounted screen.
    ///
    /// # Errors
    /// Returns [`StoreError`] when a transition could not be persisted.
    pub async fn handle(
        &mut self,
        command: Command,
    ) -> Result<Flow, StoreError> {
        self.notice = None;
        self.show_help = false;
        debug!(command = command.name(), "command received");

        let outcome = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Refresh => ScreenOutcome::Stay,
            Command::Help => {
                self.show_help = true;
                ScreenOutcome::Stay
            }
            Command::Step(number) => self.click_indicator(number),
            Command::Log(filter) => {
                self.notice = Some(match logging::set_log_level(&filter) {
                    Ok(()) => format!("Log filter set to '{filter}'"),
                    Err(error) => error.to_string(),
                });
                ScreenOutcome::Stay
            }
            Command::Go(path) => match resolve(&path) {
                Some(step) => ScreenOutcome::Navigate(step),
                None => {
                    self.notice = Some(format!("Not found: {path}"));
                    ScreenOutcome::Stay
                }
            },
            command => self.handle_screen_command(command).await?,
        };

        if let ScreenOutcome::Navigate(step) = outcome {
            self.navigate(step);
        }
        Ok(Flow::Continue)
    }

    /// Waits for the next async result.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Hands an async result to the mounted screen, which drops it if it was
    /// started by a different mount.
    pub async fn apply_event(
        &mut self,
        event: AppEvent,
    ) -> Result<(), StoreError> {
        match (event, &mut self.screen) {
            (AppEvent::CatalogLoaded { token, result }, ActiveScreen::Product(screen)) => {
                screen.finish_loading(&token, result);
            }
            (AppEvent::PurchaseFinished { token, result }, ActiveScreen::Confirmation(screen)) => {
                screen
                    .finish_purchase(&token, result, &mut self.store)
                    .await?;
            }
            _ => debug!("async result arrived after navigation; dropped"),
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let state = self.store.state();
        let indicators = self
            .shell
            .indicators(state)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("  ");

        let mut out = String::new();
        out.push_str(&format!("Checkout  {}\n", self.shell.active_path()));
        out.push_str(&indicators);
        out.push('\n');
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&self.screen.view(state).to_string());
        out.push_str(RULE);
        out.push('\n');
        if let Some(notice) = &self.notice {
            out.push_str(&format!("! {notice}\n"));
        }
        if self.show_help {
            out.push_str(command::HELP);
            out.push('\n');
        }
        out.push_str(&build_status_bar(&hints_for(self.screen.step())));
        out.push('\n');
        out
    }

    fn click_indicator(
        &mut self,
        number: u8,
    ) -> ScreenOutcome {
        let Some(step) = number.checked_sub(1).and_then(CheckoutStep::from_ordinal) else {
            self.notice = Some(format!("There is no step {number}"));
            return ScreenOutcome::Stay;
        };
        match self.shell.click(step, self.store.state()) {
            Some(step) => ScreenOutcome::Navigate(step),
            None => {
                self.notice = Some(format!("Step {number} is not available"));
                ScreenOutcome::Stay
            }
        }
    }

    async fn handle_screen_command(
        &mut self,
        command: Command,
    ) -> Result<ScreenOutcome, StoreError> {
        let name = command.name();
        let outcome = match (&mut self.screen, command) {
            (ActiveScreen::Product(screen), Command::Select(id)) => {
                screen.select(&mut self.store, id).await?
            }
            (ActiveScreen::Product(screen), Command::Next) => {
                screen.continue_to_registration(&mut self.store).await?
            }
            (ActiveScreen::Registration(screen), Command::Edit { field, value }) => {
                self.notice = edit_field(screen, &field, value);
                ScreenOutcome::Stay
            }
            (ActiveScreen::Registration(screen), Command::Next) => {
                screen.submit(&mut self.store).await?
            }
            (ActiveScreen::Registration(screen), Command::Back) => screen.back(),
            (ActiveScreen::Payment(screen), Command::Edit { field, value }) => {
                self.notice = edit_field(screen, &field, value);
                ScreenOutcome::Stay
            }
            (ActiveScreen::Payment(screen), Command::Next) => {
                screen.submit(&mut self.store).await?
            }
            (ActiveScreen::Payment(screen), Command::Back) => screen.back(),
            (ActiveScreen::Confirmation(screen), Command::Confirm) => {
                match screen.begin_purchase(self.store.state()) {
                    Some(token) => spawn_purchase(
                        token,
                        Arc::clone(&self.purchases),
                        self.events_tx.clone(),
                    ),
                    None => self.notice = Some(refused_confirm(screen).to_string()),
                }
                ScreenOutcome::Stay
            }
            (ActiveScreen::Confirmation(screen), Command::Back) => {
                if screen.is_pending() {
                    self.notice = Some("Back is disabled while processing".to_string());
                }
                screen.back()
            }
            (ActiveScreen::Confirmation(screen), Command::StartOver) => screen.start_over(),
            _ => {
                self.notice = Some(format!("'{name}' is not available on this screen"));
                ScreenOutcome::Stay
            }
        };
        Ok(outcome)
    }

    /// Navigates to `step` unless it is already active.
    fn navigate(
        &mut self,
        step: CheckoutStep,
    ) {
        if step != self.shell.active() {
            self.mount(step);
        }
    }

    /// Replaces the mounted screen, following prerequisite redirects. The
    /// old screen's scope dies with it.
    fn mount(
        &mut self,
        requested: CheckoutStep,
    ) {
        let mut step = requested;
        let screen = loop {
            match ActiveScreen::mount(step, self.store.state()) {
                Ok(screen) => break screen,
                Err(target) => {
                    info!(
                        from = path_for(step),
                        to = path_for(target),
                        "prerequisite unmet; redirecting"
                    );
                    step = target;
                }
            }
        };
        self.screen = screen;
        self.shell.set_active(step);

        if let ActiveScreen::Product(screen) = &self.screen {
            spawn_catalog_fetch(
                screen.fetch_token(),
                Arc::clone(&self.catalog),
                self.events_tx.clone(),
            );
        }
    }
}

fn edit_field<S: StepForm>(
    screen: &mut FormScreen<S>,
    name: &str,
    value: String,
) -> Option<String> {
    match S::field_named(name) {
        Some(field) => {
            screen.edit(field, value);
            None
        }
        None => Some(format!("No field named '{name}'")),
    }
}

fn refused_confirm(screen: &ConfirmationScreen) -> &'static str {
    match screen.status() {
        PurchaseStatus::Pending => "A purchase is already being processed",
        PurchaseStatus::Succeeded => "This purchase is already complete",
        PurchaseStatus::Idle | PurchaseStatus::Failed(_) => "Order details are incomplete",
    }
}

/// Returns false when the app was dropped before the result arrived.
fn deliver(
    events: &mpsc::UnboundedSender<AppEvent>,
    event: AppEvent,
) -> bool {
    match events.send(event) {
        Ok(()) => true,
        Err(_) => {
            debug!("app closed before async result arrived; dropped");
            false
        }
    }
}

fn spawn_catalog_fetch(
    token: ScopeToken,
    catalog: Arc<dyn CatalogService>,
    events: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        if let Some(result) = ProductScreen::fetch(token.clone(), catalog).await {
            deliver(&events, AppEvent::CatalogLoaded { token, result });
        }
    });
}

fn spawn_purchase(
    token: ScopeToken,
    purchases: Arc<dyn PurchaseService>,
    events: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        if let Some(result) = ConfirmationScreen::submit(token.clone(), purchases).await {
            deliver(&events, AppEvent::PurchaseFinished { token, result });
        }
    });
}

/// Reads commands from `input` and writes a fresh rendering to `output`
/// after every command or async result, until `quit` or end of input.
pub async fn run<R, W>(
    mut app: CheckoutApp,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(app.render().as_bytes()).await?;
    output.flush().await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.parse::<Command>() {
                    Ok(command) => match app.handle(command).await {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => {}
                        Err(error) => {
                            error!(%error, "command failed");
                            app.set_notice(format!("Could not save progress: {error}"));
                        }
                    },
                    Err(error) => app.set_notice(error.to_string()),
                }
            }
            Some(event) = app.next_event() => {
                if let Err(error) = app.apply_event(event).await {
                    error!(%error, "failed to apply async result");
                    app.set_notice(format!("Could not save progress: {error}"));
                }
            }
        }
        output.write_all(app.render().as_bytes()).await?;
        output.flush().await?;
    }

    info!("checkout session ended");
    Ok(())
}
