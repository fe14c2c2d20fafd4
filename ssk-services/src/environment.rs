//! The service environment: one immutable aggregate of every collaborator.
//!
//! An `Environment` is assembled once at startup from fully constructed
//! collaborators, then handed to the rest of the application (directly,
//! or through [`crate::shared`]). Required roles have read-only accessors
//! and no setters. Two roles, the call message handler and the
//! notifications presenter, are owned by later startup stages and are
//! attached after construction through lock-free late-bound slots.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ssk_core::config::EnvironmentConfig;
use ssk_core::error::{SskError, SskResult};

use crate::capabilities::*;
use crate::collaborator::{Collaborator, CollaboratorHealth};
use crate::event_bus::{EnvironmentEvent, EventBus};
use crate::late_bound::LateBound;
#[cfg(any(test, feature = "testing"))]
use crate::noop::NoopCollaborator;

/// Role name of the late-bound call message handler.
pub const CALL_MESSAGE_HANDLER: &str = "call_message_handler";

/// Role name of the late-bound notifications presenter.
pub const NOTIFICATIONS_PRESENTER: &str = "notifications_presenter";

macro_rules! environment {
    ($( $(#[$doc:meta])* $role:ident: $capability:ident, )+) => {
        /// Every required collaborator, by role.
        ///
        /// All fields are mandatory, so a literal that omits a role does not
        /// compile. Use [`EnvironmentBuilder`] when collaborators are
        /// gathered dynamically.
        pub struct EnvironmentParts {
            $( $(#[$doc])* pub $role: Arc<dyn $capability>, )+
        }

        /// Names of the required roles, in declaration order.
        pub const REQUIRED_ROLES: &[&str] = &[$( stringify!($role) ),+];

        /// Central registry of every collaborator the application uses.
        pub struct Environment {
            $( $role: Arc<dyn $capability>, )+
            call_message_handler: LateBound<dyn CallMessageHandler>,
            notifications_presenter: LateBound<dyn NotificationsPresenter>,
            event_bus: EventBus,
        }

        impl Environment {
            fn assemble(parts: EnvironmentParts, event_bus: EventBus) -> Self {
                Self {
                    $( $role: parts.$role, )+
                    call_message_handler: LateBound::empty(),
                    notifications_presenter: LateBound::empty(),
                    event_bus,
                }
            }

            $(
                $(#[$doc])*
                pub fn $role(&self) -> &Arc<dyn $capability> {
                    &self.$role
                }
            )+

            fn required_health(&self) -> Vec<CollaboratorHealth> {
                vec![$( CollaboratorHealth::check(stringify!($role), &*self.$role) ),+]
            }
        }

        /// Runtime assembly of [`EnvironmentParts`].
        ///
        /// `build` refuses to produce an environment while any required
        /// role is unset and reports every missing role at once.
        #[derive(Default)]
        pub struct EnvironmentBuilder {
            $( $role: Option<Arc<dyn $capability>>, )+
        }

        impl EnvironmentBuilder {
            $(
                #[doc = concat!("Supply the `", stringify!($role), "` collaborator.")]
                pub fn $role(mut self, collaborator: Arc<dyn $capability>) -> Self {
                    self.$role = Some(collaborator);
                    self
                }
            )+

            /// Roles not supplied yet, in declaration order.
            pub fn missing(&self) -> Vec<&'static str> {
                let mut missing = Vec::new();
                $(
                    if self.$role.is_none() {
                        missing.push(stringify!($role));
                    }
                )+
                missing
            }

            /// Fill every unset role with a [`NoopCollaborator`] named after
            /// the role, except the roles listed in `keep_missing`.
            #[cfg(any(test, feature = "testing"))]
            pub fn fill_missing_with_noop_except(mut self, keep_missing: &[&str]) -> Self {
                $(
                    if self.$role.is_none() && !keep_missing.contains(&stringify!($role)) {
                        debug!("filling {} with a noop collaborator", stringify!($role));
                        self.$role = Some(NoopCollaborator::shared(stringify!($role)));
                    }
                )+
                self
            }

            /// Convert into parts, failing if any role is unset.
            pub fn into_parts(self) -> SskResult<EnvironmentParts> {
                let missing = self.missing();
                if !missing.is_empty() {
                    return Err(SskError::MissingCollaborators(missing));
                }
                Ok(EnvironmentParts {
                    $(
                        $role: self.$role.ok_or_else(|| {
                            SskError::MissingCollaborators(vec![stringify!($role)])
                        })?,
                    )+
                })
            }
        }
    };
}

environment! {
    /// Contacts manager.
    contacts_manager: ContactsManager,
    /// Link preview manager.
    link_preview_manager: LinkPreviewManager,
    /// Outgoing message sender.
    message_sender: MessageSender,
    /// Job queue feeding the message sender.
    message_sender_job_queue: MessageSenderJobQueue,
    /// Recorder for receipts that could not be sent yet.
    pending_receipt_recorder: PendingReceiptRecorder,
    /// Profile manager.
    profile_manager: ProfileManager,
    /// REST network manager.
    network_manager: NetworkManager,
    /// Incoming message manager.
    message_manager: MessageManager,
    /// Blocking manager.
    blocking_manager: BlockingManager,
    /// Identity key manager.
    identity_manager: IdentityManager,
    /// Remote config manager.
    remote_config_manager: RemoteConfigManager,
    /// Session store.
    session_store: SessionStore,
    /// Signed pre-key store.
    signed_pre_key_store: SignedPreKeyStore,
    /// Pre-key store.
    pre_key_store: PreKeyStore,
    /// Unidentified delivery manager.
    ud_manager: UnidentifiedDeliveryManager,
    /// Message decrypter.
    message_decrypter: MessageDecrypter,
    /// Group v2 message processor.
    groups_v2_message_processor: GroupsV2MessageProcessor,
    /// Websocket manager.
    socket_manager: SocketManager,
    /// Account manager.
    account_manager: AccountManager,
    /// Two-factor (registration lock) manager.
    two_factor_manager: TwoFactorManager,
    /// Disappearing messages job.
    disappearing_messages_job: DisappearingMessagesJob,
    /// Incoming receipt manager.
    receipt_manager: ReceiptManager,
    /// Outgoing receipt manager.
    outgoing_receipt_manager: OutgoingReceiptManager,
    /// Reachability manager.
    reachability_manager: ReachabilityManager,
    /// Sync manager.
    sync_manager: SyncManager,
    /// Typing indicators.
    typing_indicators: TypingIndicators,
    /// Attachment downloads.
    attachment_downloads: AttachmentDownloads,
    /// Sticker manager.
    sticker_manager: StickerManager,
    /// Database storage.
    database_storage: DatabaseStorage,
    /// Service address cache.
    address_cache: AddressCache,
    /// Account service client.
    account_service_client: AccountServiceClient,
    /// Storage service manager.
    storage_service_manager: StorageServiceManager,
    /// Storage coordinator.
    storage_coordinator: StorageCoordinator,
    /// Kit preferences.
    preferences: Preferences,
    /// Groups v2 service.
    groups_v2: GroupsV2,
    /// Group v2 updates.
    group_v2_updates: GroupV2Updates,
    /// Message fetcher job.
    message_fetcher_job: MessageFetcherJob,
    /// Bulk profile fetch.
    bulk_profile_fetch: BulkProfileFetch,
    /// Bulk UUID lookup.
    bulk_uuid_lookup: BulkUuidLookup,
    /// Versioned profiles.
    versioned_profiles: VersionedProfiles,
    /// Model read caches.
    model_read_caches: ModelReadCaches,
    /// Early message manager.
    early_message_manager: EarlyMessageManager,
    /// Message pipeline supervisor.
    message_pipeline_supervisor: MessagePipelineSupervisor,
    /// App expiry tracking.
    app_expiry: AppExpiry,
    /// Message processor.
    message_processor: MessageProcessor,
    /// Payments.
    payments: Payments,
    /// Payments currencies.
    payments_currencies: PaymentsCurrencies,
    /// Spam challenge resolver.
    spam_challenge_resolver: SpamChallengeResolver,
    /// Sender key store.
    sender_key_store: SenderKeyStore,
    /// Phone number utilities.
    phone_number_util: PhoneNumberUtil,
}

impl EnvironmentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every unset role with a [`NoopCollaborator`].
    #[cfg(any(test, feature = "testing"))]
    pub fn fill_missing_with_noop(self) -> Self {
        self.fill_missing_with_noop_except(&[])
    }

    /// Build an environment with default settings.
    pub fn build(self) -> SskResult<Environment> {
        self.build_with_config(&EnvironmentConfig::default())
    }

    /// Build an environment with the given settings.
    pub fn build_with_config(self, config: &EnvironmentConfig) -> SskResult<Environment> {
        Ok(Environment::with_config(self.into_parts()?, config))
    }
}

impl Environment {
    /// Create an environment with default settings.
    pub fn new(parts: EnvironmentParts) -> Self {
        Self::with_config(parts, &EnvironmentConfig::default())
    }

    /// Create an environment with the given settings.
    pub fn with_config(parts: EnvironmentParts, config: &EnvironmentConfig) -> Self {
        let env = Self::assemble(parts, EventBus::new());
        info!(
            "environment constructed with {} required collaborators",
            REQUIRED_ROLES.len()
        );
        if config.report_unhealthy {
            for health in env.required_health().iter().filter(|h| !h.healthy) {
                warn!("collaborator not ready at construction: {health}");
            }
        }
        env
    }

    /// Start a runtime builder.
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::new()
    }

    // -- Late-bound slots --

    /// Attach the call message handler. Re-attaching replaces the previous one.
    pub fn set_call_message_handler(&self, handler: Arc<dyn CallMessageHandler>) {
        info!("attaching {CALL_MESSAGE_HANDLER}: {}", handler.name());
        self.call_message_handler.set(handler);
        self.event_bus.emit(EnvironmentEvent::LateBoundAttached {
            role: CALL_MESSAGE_HANDLER,
        });
    }

    /// The call message handler, if attached.
    pub fn call_message_handler(&self) -> Option<Arc<dyn CallMessageHandler>> {
        self.call_message_handler.get()
    }

    /// Attach the notifications presenter. Re-attaching replaces the previous one.
    pub fn set_notifications_presenter(&self, presenter: Arc<dyn NotificationsPresenter>) {
        info!("attaching {NOTIFICATIONS_PRESENTER}: {}", presenter.name());
        self.notifications_presenter.set(presenter);
        self.event_bus.emit(EnvironmentEvent::LateBoundAttached {
            role: NOTIFICATIONS_PRESENTER,
        });
    }

    /// The notifications presenter, if attached.
    pub fn notifications_presenter(&self) -> Option<Arc<dyn NotificationsPresenter>> {
        self.notifications_presenter.get()
    }

    // -- Completeness --

    /// Whether every collaborator is wired.
    ///
    /// Required roles are guaranteed by construction, so only the
    /// late-bound roles are checked. Returning false is the normal state
    /// during startup, not an error.
    pub fn is_complete(&self) -> bool {
        self.call_message_handler.is_set() && self.notifications_presenter.is_set()
    }

    /// Late-bound roles that are not attached yet.
    pub fn missing_late_bound(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.call_message_handler.is_set() {
            missing.push(CALL_MESSAGE_HANDLER);
        }
        if !self.notifications_presenter.is_set() {
            missing.push(NOTIFICATIONS_PRESENTER);
        }
        if !missing.is_empty() {
            debug!("environment incomplete, waiting on: {}", missing.join(", "));
        }
        missing
    }

    /// Health of every required collaborator plus the attached late-bound ones.
    pub fn health_check(&self) -> Vec<CollaboratorHealth> {
        let mut results = self.required_health();
        if let Some(handler) = self.call_message_handler() {
            results.push(CollaboratorHealth::check(CALL_MESSAGE_HANDLER, &*handler));
        }
        if let Some(presenter) = self.notifications_presenter() {
            results.push(CollaboratorHealth::check(NOTIFICATIONS_PRESENTER, &*presenter));
        }
        results
    }

    // -- Events --

    /// Tell every subscribed observer to warm its caches from storage.
    ///
    /// Queues exactly one `WarmCaches` event per call on each current
    /// subscriber's unbounded queue, synchronously from the caller. Nothing
    /// is dropped or coalesced however far behind an observer is. Observers
    /// do their own work on their own tasks; their failures never come back
    /// here. Returns the number of observers the signal was queued for.
    pub fn warm_caches(&self) -> usize {
        let observers = self.event_bus.emit(EnvironmentEvent::WarmCaches);
        info!("warm caches broadcast to {observers} observer(s)");
        observers
    }

    /// Subscribe to environment events.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<EnvironmentEvent> {
        self.event_bus.subscribe()
    }

    /// The environment's event bus.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("required", &REQUIRED_ROLES.len())
            .field(CALL_MESSAGE_HANDLER, &self.call_message_handler)
            .field(NOTIFICATIONS_PRESENTER, &self.notifications_presenter)
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_environment() -> Environment {
        Environment::builder().fill_missing_with_noop().build().unwrap()
    }

    #[test]
    fn test_required_roles() {
        assert_eq!(REQUIRED_ROLES.len(), 50);
        assert!(REQUIRED_ROLES.contains(&"sender_key_store"));
        assert!(!REQUIRED_ROLES.contains(&CALL_MESSAGE_HANDLER));
        assert!(!REQUIRED_ROLES.contains(&NOTIFICATIONS_PRESENTER));
    }

    #[test]
    fn test_accessors_return_supplied_collaborator() {
        let sender: Arc<dyn MessageSender> = NoopCollaborator::shared("sender");
        let sessions: Arc<dyn SessionStore> = NoopCollaborator::shared("sessions");

        let env = Environment::builder()
            .message_sender(Arc::clone(&sender))
            .session_store(Arc::clone(&sessions))
            .fill_missing_with_noop()
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(env.message_sender(), &sender));
        assert!(Arc::ptr_eq(env.session_store(), &sessions));
        assert_eq!(env.payments().name(), "payments");
    }

    #[test]
    fn test_every_role_is_wired_to_its_own_collaborator() {
        let env = noop_environment();
        let health = env.health_check();
        assert_eq!(health.len(), REQUIRED_ROLES.len());
        for (report, role) in health.iter().zip(REQUIRED_ROLES) {
            assert_eq!(report.role, *role);
            assert_eq!(report.name, *role);
            assert!(report.healthy);
        }
    }

    #[test]
    fn test_new_from_parts() {
        let mut parts = Environment::builder().fill_missing_with_noop().into_parts().unwrap();
        let decrypter: Arc<dyn MessageDecrypter> = NoopCollaborator::shared("decrypter");
        parts.message_decrypter = Arc::clone(&decrypter);

        let env = Environment::new(parts);
        assert!(Arc::ptr_eq(env.message_decrypter(), &decrypter));
        assert!(!env.is_complete());
    }

    #[test]
    fn test_empty_builder_reports_every_role() {
        let builder = EnvironmentBuilder::new();
        assert_eq!(builder.missing(), REQUIRED_ROLES.to_vec());

        match builder.build() {
            Err(SskError::MissingCollaborators(missing)) => {
                assert_eq!(missing.len(), REQUIRED_ROLES.len());
            }
            other => panic!("expected MissingCollaborators, got {other:?}"),
        }
    }

    #[test]
    fn test_any_single_missing_role_fails() {
        for role in REQUIRED_ROLES {
            let result = EnvironmentBuilder::new()
                .fill_missing_with_noop_except(&[*role])
                .build();
            match result {
                Err(SskError::MissingCollaborators(missing)) => assert_eq!(missing, vec![*role]),
                other => panic!("expected {role} to be missing, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_completeness_matrix() {
        let cases = [(false, false, false), (true, false, false), (false, true, false), (true, true, true)];
        for (calls, notifications, expected) in cases {
            let env = noop_environment();
            if calls {
                env.set_call_message_handler(NoopCollaborator::shared("calls"));
            }
            if notifications {
                env.set_notifications_presenter(NoopCollaborator::shared("notifications"));
            }
            assert_eq!(
                env.is_complete(),
                expected,
                "calls={calls} notifications={notifications}"
            );
        }
    }

    #[test]
    fn test_missing_late_bound() {
        let env = noop_environment();
        assert_eq!(env.missing_late_bound(), vec![CALL_MESSAGE_HANDLER, NOTIFICATIONS_PRESENTER]);

        env.set_notifications_presenter(NoopCollaborator::shared("notifications"));
        assert_eq!(env.missing_late_bound(), vec![CALL_MESSAGE_HANDLER]);

        env.set_call_message_handler(NoopCollaborator::shared("calls"));
        assert!(env.missing_late_bound().is_empty());
    }

    #[test]
    fn test_late_bound_reattach_replaces() {
        let env = noop_environment();
        let first: Arc<dyn CallMessageHandler> = NoopCollaborator::shared("first");
        let second: Arc<dyn CallMessageHandler> = NoopCollaborator::shared("second");

        env.set_call_message_handler(Arc::clone(&first));
        assert!(Arc::ptr_eq(&env.call_message_handler().unwrap(), &first));

        env.set_call_message_handler(Arc::clone(&second));
        assert!(Arc::ptr_eq(&env.call_message_handler().unwrap(), &second));
        assert!(env.notifications_presenter().is_none());
    }

    #[test]
    fn test_health_check_includes_attached_late_bound() {
        let env = noop_environment();
        env.set_call_message_handler(NoopCollaborator::shared("calls"));
        let health = env.health_check();
        assert_eq!(health.len(), REQUIRED_ROLES.len() + 1);
        let last = health.last().unwrap();
        assert_eq!(last.role, CALL_MESSAGE_HANDLER);
        assert_eq!(last.name, "calls");
    }

    #[test]
    fn test_attach_emits_event() {
        let env = noop_environment();
        let mut rx = env.subscribe();
        env.set_notifications_presenter(NoopCollaborator::shared("notifications"));
        assert_eq!(
            rx.try_recv().unwrap(),
            EnvironmentEvent::LateBoundAttached { role: NOTIFICATIONS_PRESENTER }
        );
    }

    #[test]
    fn test_warm_caches_delivers_once_per_call() {
        let env = noop_environment();
        let mut first = env.subscribe();
        let mut second = env.subscribe();

        assert_eq!(env.warm_caches(), 2);
        assert_eq!(env.warm_caches(), 2);

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.try_recv().unwrap(), EnvironmentEvent::WarmCaches);
            assert_eq!(rx.try_recv().unwrap(), EnvironmentEvent::WarmCaches);
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_warm_caches_without_observers() {
        let env = noop_environment();
        assert_eq!(env.warm_caches(), 0);
    }

    #[test]
    fn test_undrained_observer_gets_every_warm_signal() {
        let env = noop_environment();
        let mut rx = env.subscribe();
        env.set_call_message_handler(NoopCollaborator::shared("calls"));
        for _ in 0..300 {
            assert_eq!(env.warm_caches(), 1);
        }

        let mut warm = 0;
        while let Ok(event) = rx.try_recv() {
            if event == EnvironmentEvent::WarmCaches {
                warm += 1;
            }
        }
        assert_eq!(warm, 300);
    }

    #[test]
    fn test_quiet_config_still_builds() {
        let config = EnvironmentConfig { report_unhealthy: false };
        let env = Environment::builder()
            .fill_missing_with_noop()
            .build_with_config(&config)
            .unwrap();
        assert_eq!(env.required_health().len(), REQUIRED_ROLES.len());
    }
}
