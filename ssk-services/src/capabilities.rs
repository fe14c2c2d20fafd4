//! Capability traits, one per environment role.
//!
//! Each role is a capability set rather than a concrete type, so any
//! implementation can be substituted for a role without the environment
//! knowing how it was built. The environment itself only relies on the
//! `Collaborator` supertrait; everything else a role offers belongs to
//! the collaborator's own crate.

use crate::collaborator::Collaborator;
use crate::noop::NoopCollaborator;

macro_rules! capabilities {
    ($( $(#[$meta:meta])* $name:ident; )+) => {
        $(
            $(#[$meta])*
            pub trait $name: Collaborator {}

            impl $name for NoopCollaborator {}
        )+
    };
}

capabilities! {
    // -- Contacts, profiles and identity --
    /// Resolves addresses to system and profile contacts.
    ContactsManager;
    /// Fetches and stores the local and remote profiles.
    ProfileManager;
    /// Versioned profile credentials.
    VersionedProfiles;
    /// Batched profile refreshes.
    BulkProfileFetch;
    /// Batched UUID discovery for phone numbers.
    BulkUuidLookup;
    /// Maps between phone numbers and UUIDs for known addresses.
    AddressCache;
    /// Phone number parsing and formatting.
    PhoneNumberUtil;
    /// Identity keys and their verification state.
    IdentityManager;
    /// Blocked addresses and groups.
    BlockingManager;

    // -- Cryptographic stores --
    /// Per-device session records.
    SessionStore;
    /// Signed pre-keys for the local device.
    SignedPreKeyStore;
    /// One-time pre-keys for the local device.
    PreKeyStore;
    /// Sender-key distribution state for group sends.
    SenderKeyStore;
    /// Sealed-sender certificates and access keys.
    UnidentifiedDeliveryManager;

    // -- Message pipeline --
    /// Sends outgoing messages.
    MessageSender;
    /// Durable queue feeding the message sender.
    MessageSenderJobQueue;
    /// Decrypts incoming envelopes.
    MessageDecrypter;
    /// Applies decrypted messages to local state.
    MessageManager;
    /// Orders and batches decrypted envelopes.
    MessageProcessor;
    /// Processes group v2 updates carried by messages.
    GroupsV2MessageProcessor;
    /// Pulls queued messages from the service.
    MessageFetcherJob;
    /// Holds messages that arrived before the message they refer to.
    EarlyMessageManager;
    /// Suspends and resumes the pipeline as a whole.
    MessagePipelineSupervisor;
    /// Expires disappearing messages.
    DisappearingMessagesJob;

    // -- Receipts and indicators --
    /// Records receipts that could not be sent yet.
    PendingReceiptRecorder;
    /// Applies incoming read and viewed receipts.
    ReceiptManager;
    /// Sends delivery and read receipts.
    OutgoingReceiptManager;
    /// Typing indicator state for conversations.
    TypingIndicators;

    // -- Networking --
    /// REST request transport.
    NetworkManager;
    /// Authenticated and unidentified websockets.
    SocketManager;
    /// Network reachability observation.
    ReachabilityManager;
    /// Account service REST client.
    AccountServiceClient;
    /// Solves spam challenges issued by the service.
    SpamChallengeResolver;

    // -- Account and settings --
    /// Local account registration state.
    AccountManager;
    /// Registration lock and PIN management.
    TwoFactorManager;
    /// Remotely controlled feature flags.
    RemoteConfigManager;
    /// Persisted kit preferences.
    Preferences;
    /// Tracks when this build expires.
    AppExpiry;

    // -- Groups --
    /// Group v2 service operations.
    GroupsV2;
    /// Applies group v2 state changes.
    GroupV2Updates;

    // -- Sync and storage --
    /// Multi-device sync messages.
    SyncManager;
    /// Storage service records.
    StorageServiceManager;
    /// Coordinates database migration and readiness.
    StorageCoordinator;
    /// The database engine.
    DatabaseStorage;
    /// Read-through caches over database models.
    ModelReadCaches;

    // -- Attachments and media --
    /// Attachment download queue.
    AttachmentDownloads;
    /// Installed sticker packs.
    StickerManager;
    /// Link preview fetching.
    LinkPreviewManager;

    // -- Payments --
    /// Payments state and operations.
    Payments;
    /// Currency conversion for payments.
    PaymentsCurrencies;

    // -- Late-bound roles --
    /// Handles call signalling messages. Attached after construction.
    CallMessageHandler;
    /// Presents user-facing notifications. Attached after construction.
    NotificationsPresenter;
}
