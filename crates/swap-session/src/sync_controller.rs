//! Session orchestration.
//!
//! The controller owns the session state and a single event queue. Every
//! asynchronous completion (debounce timers, quotes, reserve pushes, balance
//! reads) comes back as a `SessionEvent` tagged with the pair epoch and, for
//! quotes, the per-side generation it was issued under; the controller
//! applies an effect only when those tags still match current state, so a
//! superseded call is discarded rather than applied. No locks are needed:
//! spawned helpers never touch the session, they only send events.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::allowance_guard::AllowanceGuard;
use crate::chain::{ChainError, ChainReader, ChainSigner, NotificationSink, ReserveEvents, TxHandle};
use crate::config::AppConfig;
use crate::pair_resolver::PairResolver;
use crate::quote_engine::{DebouncedSide, QuoteEngine};
use crate::reserve_tracker::{ReserveTracker, SubscriptionHandle};
use crate::session::Session;
use crate::swap_executor::SwapExecutor;
use crate::token_list::Token;
use crate::types::{format_amount, from_base_units, parse_positive_amount, PairReserves, Side, SwapError};

/// Completion events applied to the session by the controller.
#[derive(Debug)]
pub enum SessionEvent {
    /// A side's debounce window elapsed. `side` is the side that was typed
    /// on; the quote it triggers fills the opposite field.
    DebounceFired { side: Side, generation: u64 },
    /// A quote request resolved for the side that was typed on.
    QuoteResolved {
        side: Side,
        generation: u64,
        epoch: u64,
        outcome: Result<Decimal, ChainError>,
    },
    /// Oriented reserves pushed by the pair subscription.
    ReserveUpdate { epoch: u64, reserves: PairReserves },
    /// Balance read finished for the given from token.
    FundsChecked { token: Address, balance: Decimal },
}

/// What a swap submission actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Approval was needed and has been submitted; the user must submit the
    /// swap again once it confirms. Deliberately a two-step flow.
    ApprovalSubmitted(TxHandle),
    SwapSubmitted(TxHandle),
    NotSubmitted,
}

pub struct SyncController {
    session: Session,
    native_symbol: String,
    debounce_window: Duration,
    display_decimals: u32,

    reader: Arc<dyn ChainReader>,
    resolver: PairResolver,
    tracker: ReserveTracker,
    quotes: Arc<QuoteEngine>,
    guard: AllowanceGuard,
    executor: SwapExecutor,
    sink: Arc<dyn NotificationSink>,

    signer: Option<Arc<dyn ChainSigner>>,
    account: Option<Address>,

    /// Bumped on every token-selection change or flip; versions all
    /// pair-keyed async effects.
    epoch: u64,
    from_debounce: DebouncedSide,
    to_debounce: DebouncedSide,
    /// At most one live reserve subscription; the previous handle is
    /// disposed before a new one is created.
    subscription: Option<SubscriptionHandle>,

    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl SyncController {
    pub fn new(
        config: &AppConfig,
        from_token: Token,
        reader: Arc<dyn ChainReader>,
        events: Arc<dyn ReserveEvents>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(from_token),
            native_symbol: config.native_symbol.clone(),
            debounce_window: config.debounce_window(),
            display_decimals: config.display_decimals,
            resolver: PairResolver::new(reader.clone()),
            tracker: ReserveTracker::new(reader.clone(), events),
            quotes: Arc::new(QuoteEngine::new(reader.clone())),
            guard: AllowanceGuard::new(reader.clone(), config.router_address),
            executor: SwapExecutor::new(
                reader.clone(),
                config.native_symbol.clone(),
                config.deadline_offset_secs,
            ),
            sink,
            reader,
            signer: None,
            account: None,
            epoch: 0,
            from_debounce: DebouncedSide::default(),
            to_debounce: DebouncedSide::default(),
            subscription: None,
            events_tx,
            events_rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Attach a connected wallet and re-run the checks that depend on the
    /// active account.
    pub async fn connect_wallet(&mut self, signer: Arc<dyn ChainSigner>) {
        match signer.accounts().await {
            Ok(accounts) => self.account = accounts.first().copied(),
            Err(e) => warn!(error = %e, "could not list wallet accounts"),
        }
        self.signer = Some(signer);
        self.refresh_allowance().await;
        self.spawn_funds_check();
    }

    /// Token selection change on either side: invalidates all pair-keyed
    /// state, re-resolves the pair, snapshots and re-subscribes, then
    /// re-evaluates allowance and funds.
    pub async fn apply_token_selection(&mut self, side: Side, token: Token) {
        match side {
            Side::From => self.session.from_token = token,
            Side::To => self.session.to_token = Some(token),
        }
        self.refresh_pair().await;
        self.refresh_allowance().await;
        self.spawn_funds_check();
    }

    /// A keystroke on side `side`. The typed field updates immediately; the
    /// opposite field is either cleared (empty/non-positive input) or marked
    /// loading with a debounced quote scheduled.
    pub fn apply_amount_input(&mut self, side: Side, value: &str) {
        self.session.set_amount(side, value.to_string());
        // Typing over a field supersedes any pending engine fill for it:
        // the opposite side's debounced quote targets this field, and the
        // freshest user input always wins. This also keeps at most one
        // input-loading flag set at a time.
        self.debounce_mut(side.opposite()).disarm();
        self.session.set_loading(side, false);

        if parse_positive_amount(value).is_some() && self.session.to_token.is_some() {
            self.session.set_loading(side.opposite(), true);
            let generation = self.debounce_mut(side).arm();
            let window = self.debounce_window;
            let tx = self.events_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(window).await;
                let _ = tx.send(SessionEvent::DebounceFired { side, generation });
            });
        } else {
            self.debounce_mut(side).disarm();
            self.session.set_amount(side.opposite(), String::new());
            self.session.set_loading(side.opposite(), false);
        }

        if side == Side::From {
            self.spawn_funds_check();
        }
    }

    /// Swap both token identities and both amounts atomically, then refresh
    /// everything keyed to the (reoriented) pair.
    pub async fn apply_flip(&mut self) {
        if !self.session.flip() {
            return;
        }
        self.refresh_pair().await;
        self.refresh_allowance().await;
        self.spawn_funds_check();
    }

    /// Submit the swap, or — when the from token still needs approval — only
    /// the approval. Failures are pushed to the notification sink.
    pub async fn submit_swap(&mut self) -> SubmitOutcome {
        let Some(signer) = self.signer.clone() else {
            return SubmitOutcome::NotSubmitted;
        };
        let Some(path) = self.session.path() else {
            return SubmitOutcome::NotSubmitted;
        };
        if self.session.insufficient_funds {
            self.notify(&SwapError::InsufficientFunds);
            return SubmitOutcome::NotSubmitted;
        }

        if !self.session.token_approved {
            return match self.guard.approve(&path.from, signer.as_ref()).await {
                Ok(tx) => {
                    self.session.token_approved = true;
                    SubmitOutcome::ApprovalSubmitted(tx)
                }
                Err(e) => {
                    self.notify(&e);
                    SubmitOutcome::NotSubmitted
                }
            };
        }

        let Some(amount_in) = parse_positive_amount(&self.session.from_amount) else {
            return SubmitOutcome::NotSubmitted;
        };
        match self.executor.execute(amount_in, &path, signer.as_ref()).await {
            Ok(tx) => SubmitOutcome::SwapSubmitted(tx),
            Err(e) => {
                self.notify(&e);
                SubmitOutcome::NotSubmitted
            }
        }
    }

    /// Apply one completion event, discarding anything stale.
    pub async fn process(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::DebounceFired { side, generation } => {
                if !self.debounce(side).is_current(generation) {
                    return; // superseded within the burst
                }
                let Some(value) = parse_positive_amount(self.session.amount(side)) else {
                    // Input reverted to empty/zero before the window elapsed:
                    // no request, just clear the opposite field.
                    self.session.set_amount(side.opposite(), String::new());
                    self.session.set_loading(side.opposite(), false);
                    return;
                };
                let Some(path) = self.session.path() else {
                    self.session.set_loading(side.opposite(), false);
                    return;
                };
                let epoch = self.epoch;
                let quotes = self.quotes.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = match side {
                        Side::From => quotes.quote_out(value, &path).await,
                        Side::To => quotes.quote_in(value, &path).await,
                    };
                    let _ = tx.send(SessionEvent::QuoteResolved { side, generation, epoch, outcome });
                });
            }
            SessionEvent::QuoteResolved { side, generation, epoch, outcome } => {
                if epoch != self.epoch || !self.debounce(side).is_current(generation) {
                    debug!("discarding stale quote result");
                    return;
                }
                self.session.set_loading(side.opposite(), false);
                match outcome {
                    Ok(amount) => {
                        self.session.set_amount(
                            side.opposite(),
                            format_amount(amount, self.display_decimals),
                        );
                        // A To-side quote rewrote the from amount, so the
                        // balance comparison must be redone.
                        if side == Side::To {
                            self.spawn_funds_check();
                        }
                    }
                    Err(e) => warn!(error = %e, "quote request failed"),
                }
            }
            SessionEvent::ReserveUpdate { epoch, reserves } => {
                if epoch != self.epoch {
                    debug!("discarding reserve update for a superseded pair");
                    return;
                }
                // Price is informational; amount fields are not touched.
                self.session.set_reserves(reserves);
            }
            SessionEvent::FundsChecked { token, balance } => {
                if token != self.session.from_token.address {
                    return; // from token changed while the read was in flight
                }
                let requested =
                    parse_positive_amount(&self.session.from_amount).unwrap_or(Decimal::ZERO);
                self.session.insufficient_funds = requested > balance;
            }
        }
    }

    /// Run the event loop until the channel closes.
    pub async fn run(&mut self) {
        while let Some(event) = self.events_rx.recv().await {
            self.process(event).await;
        }
    }

    /// Drain events until none arrives within `idle`. Under a paused test
    /// clock this deterministically runs every pending timer and task.
    pub async fn pump(&mut self, idle: Duration) {
        while let Ok(Some(event)) = tokio::time::timeout(idle, self.events_rx.recv()).await {
            self.process(event).await;
        }
    }

    async fn refresh_pair(&mut self) {
        self.epoch += 1;
        // Tear down the previous pair's subscription before anything else so
        // a superseded pair can never write over current state.
        self.subscription = None;
        self.session.clear_pair_state();
        // Quotes scheduled under the old pair identity are superseded too.
        self.from_debounce.disarm();
        self.to_debounce.disarm();
        self.session.set_loading(Side::From, false);
        self.session.set_loading(Side::To, false);

        let Some(path) = self.session.path() else {
            return;
        };
        self.session.loading_reserves = true;

        match self.resolver.resolve(path.from.address, path.to.address).await {
            Ok(pair) if pair == Address::ZERO => {
                info!(
                    from = %path.from.symbol,
                    to = %path.to.symbol,
                    "factory has no pair for these tokens"
                );
                self.notify(&SwapError::NoLiquidity);
            }
            Ok(pair) => {
                self.session.pair_address = Some(pair);
                match self.tracker.snapshot(pair, &path).await {
                    Ok(reserves) => self.session.set_reserves(reserves),
                    Err(e) => warn!(error = %e, %pair, "reserve snapshot failed"),
                }
                match self
                    .tracker
                    .subscribe(pair, path.clone(), self.epoch, self.events_tx.clone())
                    .await
                {
                    Ok(handle) => self.subscription = Some(handle),
                    Err(e) => warn!(error = %e, %pair, "reserve subscription failed"),
                }
            }
            Err(e) => warn!(error = %e, "pair resolution failed"),
        }
        self.session.loading_reserves = false;
    }

    /// Re-evaluate the approval flag for the current from token. The native
    /// wrapped asset never needs approval.
    async fn refresh_allowance(&mut self) {
        self.session.token_approved = true;
        if self.session.from_token.symbol == self.native_symbol {
            return;
        }
        if self.session.to_token.is_none() {
            return;
        }
        let Some(signer) = self.signer.clone() else {
            return;
        };
        match self
            .guard
            .remaining_allowance(&self.session.from_token, Some(signer.as_ref()))
            .await
        {
            Ok(Some(remaining)) if remaining.is_zero() => {
                self.session.token_approved = false;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "allowance check failed"),
        }
    }

    /// Compare the requested from amount against the matching balance: the
    /// native balance only when the from token is the native wrapped asset,
    /// otherwise the token's own balance.
    fn spawn_funds_check(&self) {
        let Some(account) = self.account else {
            return;
        };
        let token = self.session.from_token.clone();
        let native = token.symbol == self.native_symbol;
        let reader = self.reader.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let raw = if native {
                reader.native_balance(account).await
            } else {
                reader.token_balance(token.address, account).await
            };
            match raw {
                Ok(raw) => {
                    let balance = from_base_units(raw, token.decimals);
                    let _ = tx.send(SessionEvent::FundsChecked { token: token.address, balance });
                }
                Err(e) => warn!(error = %e, "balance check failed"),
            }
        });
    }

    fn notify(&self, error: &SwapError) {
        match error {
            // Expected race outcome, never surfaced.
            SwapError::StaleResult => {}
            // The user changed their mind; informational, not an error.
            SwapError::UserCancelled => self.sink.info(&error.to_string()),
            _ => self.sink.error(&error.to_string()),
        }
    }

    fn debounce(&self, side: Side) -> &DebouncedSide {
        match side {
            Side::From => &self.from_debounce,
            Side::To => &self.to_debounce,
        }
    }

    fn debounce_mut(&mut self, side: Side) -> &mut DebouncedSide {
        match side {
            Side::From => &mut self.from_debounce,
            Side::To => &mut self.to_debounce,
        }
    }
}
