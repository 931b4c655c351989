//! The session manager: one lazily opened channel to the shell, request
//! correlation, and dispatch of host-pushed events to registered callbacks.
//!
//! All callback state lives inside a single dispatcher task; registrations
//! and deliveries flow through one queue, so a callback registered before
//! an event is sent is guaranteed to be installed before that event is
//! dispatched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cove_model::{
    wire, LiveActivityDescriptor, LockScreenWidgetDescriptor, NotchExperienceDescriptor,
};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::config::HostConfig;
use crate::error::CoveError;
use crate::presence::{HostPresence, InstallProbe};
use crate::protocol::{read_frame, write_frame, CallReply, Frame, HostCall, HostEvent};

/// Observed by an authorization-change subscription. Invoked every time the
/// host reports a grant or revocation, for as long as the session lives.
pub type AuthorizationCallback = Box<dyn Fn(bool) + Send + 'static>;

/// One-shot dismissal observer. Consumed when the matching entity is
/// dismissed by the user; never invoked for SDK-initiated dismissals.
pub type DismissCallback = Box<dyn FnOnce() + Send + 'static>;

/// The three entity families the host manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    LiveActivity,
    LockScreenWidget,
    NotchExperience,
}

/// Where the channel to the shell currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Everything the facade client needs from a live session. Mocked in tests.
#[async_trait]
pub trait HostSession: Send + Sync {
    fn is_host_installed(&self) -> bool;

    async fn check_authorization(&self) -> Result<bool, CoveError>;
    async fn request_authorization(&self) -> Result<bool, CoveError>;
    async fn host_version(&self) -> Result<String, CoveError>;

    async fn present_live_activity(
        &self,
        descriptor: &LiveActivityDescriptor,
    ) -> Result<(), CoveError>;
    async fn update_live_activity(
        &self,
        descriptor: &LiveActivityDescriptor,
    ) -> Result<(), CoveError>;
    async fn dismiss_live_activity(&self, id: &str) -> Result<(), CoveError>;

    async fn present_lock_screen_widget(
        &self,
        descriptor: &LockScreenWidgetDescriptor,
    ) -> Result<(), CoveError>;
    async fn update_lock_screen_widget(
        &self,
        descriptor: &LockScreenWidgetDescriptor,
    ) -> Result<(), CoveError>;
    async fn dismiss_lock_screen_widget(&self, id: &str) -> Result<(), CoveError>;

    async fn present_notch_experience(
        &self,
        descriptor: &NotchExperienceDescriptor,
    ) -> Result<(), CoveError>;
    async fn update_notch_experience(
        &self,
        descriptor: &NotchExperienceDescriptor,
    ) -> Result<(), CoveError>;
    async fn dismiss_notch_experience(&self, id: &str) -> Result<(), CoveError>;

    fn on_authorization_change(&self, callback: AuthorizationCallback);
    fn on_dismiss(&self, kind: EntityKind, id: &str, callback: DismissCallback);
}

enum DispatchCommand {
    RegisterAuthorization(AuthorizationCallback),
    RegisterDismiss(EntityKind, String, DismissCallback),
    Deliver(HostEvent),
}

fn spawn_dispatcher(mut rx: mpsc::UnboundedReceiver<DispatchCommand>) {
    tokio::spawn(async move {
        let mut authorization: Vec<AuthorizationCallback> = Vec::new();
        let mut dismissals: HashMap<(EntityKind, String), DismissCallback> = HashMap::new();

        while let Some(command) = rx.recv().await {
            match command {
                DispatchCommand::RegisterAuthorization(callback) => {
                    authorization.push(callback);
                }
                DispatchCommand::RegisterDismiss(kind, id, callback) => {
                    // Last registration for an id wins.
                    dismissals.insert((kind, id), callback);
                }
                DispatchCommand::Deliver(event) => {
                    deliver(&authorization, &mut dismissals, event);
                }
            }
        }
    });
}

fn deliver(
    authorization: &[AuthorizationCallback],
    dismissals: &mut HashMap<(EntityKind, String), DismissCallback>,
    event: HostEvent,
) {
    match event {
        HostEvent::AuthorizationChanged { granted } => {
            log::debug!("cove: authorization changed, granted={granted}");
            for callback in authorization {
                callback(granted);
            }
        }
        HostEvent::ActivityDismissed { id } => {
            fire_dismiss(dismissals, EntityKind::LiveActivity, id);
        }
        HostEvent::WidgetDismissed { id } => {
            fire_dismiss(dismissals, EntityKind::LockScreenWidget, id);
        }
        HostEvent::NotchExperienceDismissed { id } => {
            fire_dismiss(dismissals, EntityKind::NotchExperience, id);
        }
    }
}

fn fire_dismiss(
    dismissals: &mut HashMap<(EntityKind, String), DismissCallback>,
    kind: EntityKind,
    id: String,
) {
    if let Some(callback) = dismissals.remove(&(kind, id.clone())) {
        log::debug!("cove: dismissal callback fired for {kind:?} {id}");
        callback();
    } else {
        log::trace!("cove: dismissal for {kind:?} {id} without an observer");
    }
}

struct Channel {
    writer: Mutex<OwnedWriteHalf>,
    pending: StdMutex<HashMap<u64, oneshot::Sender<CallReply>>>,
}

struct SessionInner {
    config: HostConfig,
    presence: Box<dyn HostPresence>,
    link: StdMutex<LinkState>,
    channel: Mutex<Option<Arc<Channel>>>,
    next_request_id: AtomicU64,
    dispatch: mpsc::UnboundedSender<DispatchCommand>,
}

impl SessionInner {
    fn set_link(&self, state: LinkState) {
        *self.link.lock().expect("link state mutex poisoned") = state;
    }

    /// Drops the cached channel if it is still the one the caller saw, and
    /// fails every request that was waiting on it.
    async fn teardown(&self, stale: &Arc<Channel>) {
        let mut guard = self.channel.lock().await;
        if guard
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, stale))
        {
            *guard = None;
            self.set_link(LinkState::Disconnected);
        }
        drop(guard);

        let waiting = {
            let mut pending = stale.pending.lock().expect("pending map mutex poisoned");
            std::mem::take(&mut *pending)
        };
        if !waiting.is_empty() {
            log::warn!("cove: dropping {} in-flight request(s)", waiting.len());
        }
        // Dropping the senders wakes each waiter with a channel error.
    }
}

/// Production session over a unix socket. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Builds a session with the default filesystem presence probe.
    ///
    /// Spawns the event dispatcher, so this must be called from within a
    /// tokio runtime.
    pub fn new(config: HostConfig) -> Self {
        let probe = InstallProbe::new(config.install_path.clone());
        Self::with_presence(config, probe)
    }

    /// Builds a session with an injected presence probe. Tests use this to
    /// simulate a missing host without touching the filesystem.
    pub fn with_presence(config: HostConfig, presence: impl HostPresence + 'static) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_dispatcher(rx);
        Self {
            inner: Arc::new(SessionInner {
                config,
                presence: Box::new(presence),
                link: StdMutex::new(LinkState::Disconnected),
                channel: Mutex::new(None),
                next_request_id: AtomicU64::new(1),
                dispatch: tx,
            }),
        }
    }

    pub fn link_state(&self) -> LinkState {
        *self.inner.link.lock().expect("link state mutex poisoned")
    }

    /// Returns the live channel, opening it first if necessary.
    async fn channel(&self) -> Result<Arc<Channel>, CoveError> {
        if !self.inner.presence.is_installed() {
            return Err(CoveError::HostNotInstalled);
        }

        let mut guard = self.inner.channel.lock().await;
        if let Some(existing) = guard.as_ref() {
            return Ok(existing.clone());
        }

        self.inner.set_link(LinkState::Connecting);
        let path = &self.inner.config.socket_path;
        log::debug!("cove: connecting to {}", path.display());
        let stream = match UnixStream::connect(path).await {
            Ok(stream) => stream,
            Err(err) => {
                self.inner.set_link(LinkState::Disconnected);
                log::warn!("cove: connect to {} failed: {err}", path.display());
                return Err(CoveError::connection_failed(err));
            }
        };

        let (read_half, write_half) = stream.into_split();
        let channel = Arc::new(Channel {
            writer: Mutex::new(write_half),
            pending: StdMutex::new(HashMap::new()),
        });
        *guard = Some(channel.clone());
        self.inner.set_link(LinkState::Connected);

        let inner = self.inner.clone();
        let reader_channel = channel.clone();
        tokio::spawn(async move {
            let mut read_half = read_half;
            loop {
                match read_frame(&mut read_half).await {
                    Ok(Frame::Response { id, reply }) => {
                        let waiter = reader_channel
                            .pending
                            .lock()
                            .expect("pending map mutex poisoned")
                            .remove(&id);
                        match waiter {
                            Some(tx) => {
                                let _ = tx.send(reply);
                            }
                            None => log::warn!("cove: response for unknown request #{id}"),
                        }
                    }
                    Ok(Frame::Event { event }) => {
                        let _ = inner.dispatch.send(DispatchCommand::Deliver(event));
                    }
                    Ok(Frame::Request { id, .. }) => {
                        log::warn!("cove: host sent a request frame (#{id}), ignoring");
                    }
                    Err(err) => {
                        log::info!("cove: channel closed: {err}");
                        break;
                    }
                }
            }
            inner.teardown(&reader_channel).await;
        });

        Ok(channel)
    }

    async fn call(&self, call: HostCall) -> Result<CallReply, CoveError> {
        let method = call.method_name();
        let channel = self.channel().await?;
        let id = self.inner.next_request_id.fetch_add(1, Ordering::Relaxed);

        let (tx, rx) = oneshot::channel();
        channel
            .pending
            .lock()
            .expect("pending map mutex poisoned")
            .insert(id, tx);

        let frame = Frame::Request { id, call };
        {
            let mut writer = channel.writer.lock().await;
            if let Err(err) = write_frame(&mut *writer, &frame).await {
                drop(writer);
                channel
                    .pending
                    .lock()
                    .expect("pending map mutex poisoned")
                    .remove(&id);
                self.inner.teardown(&channel).await;
                return Err(CoveError::connection_failed(err));
            }
        }
        log::trace!("cove: sent {method} request #{id}");

        match tokio::time::timeout(self.inner.config.request_timeout(), rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(CoveError::connection_failed(
                "channel closed before the host replied",
            )),
            Err(_) => {
                channel
                    .pending
                    .lock()
                    .expect("pending map mutex poisoned")
                    .remove(&id);
                log::warn!("cove: {method} request #{id} timed out");
                Err(CoveError::connection_failed("request timed out"))
            }
        }
    }

    /// A call whose only success shape is a bare acknowledgement.
    async fn call_ack(&self, call: HostCall) -> Result<(), CoveError> {
        match self.call(call).await? {
            CallReply::Ack => Ok(()),
            CallReply::Fault { fault } => Err(fault.into()),
            other => {
                log::warn!("cove: unexpected reply shape: {other:?}");
                Err(CoveError::ServiceUnavailable)
            }
        }
    }

    async fn call_granted(&self, call: HostCall) -> Result<bool, CoveError> {
        match self.call(call).await? {
            CallReply::Authorized { granted } => Ok(granted),
            CallReply::Fault { fault } => Err(fault.into()),
            other => {
                log::warn!("cove: unexpected reply shape: {other:?}");
                Err(CoveError::ServiceUnavailable)
            }
        }
    }

    fn application_id(&self) -> String {
        self.inner.config.application_id.clone()
    }
}

fn encode_payload<T: serde::Serialize>(descriptor: &T) -> Result<Vec<u8>, CoveError> {
    wire::encode(descriptor).map_err(|err| CoveError::Unknown {
        message: format!("payload encoding failed: {err}"),
    })
}

#[async_trait]
impl HostSession for Session {
    fn is_host_installed(&self) -> bool {
        self.inner.presence.is_installed()
    }

    async fn check_authorization(&self) -> Result<bool, CoveError> {
        self.call_granted(HostCall::CheckAuthorization {
            application_id: self.application_id(),
        })
        .await
    }

    async fn request_authorization(&self) -> Result<bool, CoveError> {
        self.call_granted(HostCall::RequestAuthorization {
            application_id: self.application_id(),
        })
        .await
    }

    async fn host_version(&self) -> Result<String, CoveError> {
        match self.call(HostCall::GetVersion).await? {
            CallReply::Version { version } => Ok(version),
            CallReply::Fault { fault } => Err(fault.into()),
            other => {
                log::warn!("cove: unexpected reply shape: {other:?}");
                Err(CoveError::ServiceUnavailable)
            }
        }
    }

    async fn present_live_activity(
        &self,
        descriptor: &LiveActivityDescriptor,
    ) -> Result<(), CoveError> {
        let payload = encode_payload(descriptor)?;
        self.call_ack(HostCall::PresentLiveActivity { payload }).await
    }

    async fn update_live_activity(
        &self,
        descriptor: &LiveActivityDescriptor,
    ) -> Result<(), CoveError> {
        let payload = encode_payload(descriptor)?;
        self.call_ack(HostCall::UpdateLiveActivity { payload }).await
    }

    async fn dismiss_live_activity(&self, id: &str) -> Result<(), CoveError> {
        self.call_ack(HostCall::DismissLiveActivity {
            id: id.to_owned(),
            application_id: self.application_id(),
        })
        .await
    }

    async fn present_lock_screen_widget(
        &self,
        descriptor: &LockScreenWidgetDescriptor,
    ) -> Result<(), CoveError> {
        let payload = encode_payload(descriptor)?;
        self.call_ack(HostCall::PresentLockScreenWidget { payload })
            .await
    }

    async fn update_lock_screen_widget(
        &self,
        descriptor: &LockScreenWidgetDescriptor,
    ) -> Result<(), CoveError> {
        let payload = encode_payload(descriptor)?;
        self.call_ack(HostCall::UpdateLockScreenWidget { payload })
            .await
    }

    async fn dismiss_lock_screen_widget(&self, id: &str) -> Result<(), CoveError> {
        self.call_ack(HostCall::DismissLockScreenWidget {
            id: id.to_owned(),
            application_id: self.application_id(),
        })
        .await
    }

    async fn present_notch_experience(
        &self,
        descriptor: &NotchExperienceDescriptor,
    ) -> Result<(), CoveError> {
        let payload = encode_payload(descriptor)?;
        self.call_ack(HostCall::PresentNotchExperience { payload })
            .await
    }

    async fn update_notch_experience(
        &self,
        descriptor: &NotchExperienceDescriptor,
    ) -> Result<(), CoveError> {
        let payload = encode_payload(descriptor)?;
        self.call_ack(HostCall::UpdateNotchExperience { payload })
            .await
    }

    async fn dismiss_notch_experience(&self, id: &str) -> Result<(), CoveError> {
        self.call_ack(HostCall::DismissNotchExperience {
            id: id.to_owned(),
            application_id: self.application_id(),
        })
        .await
    }

    fn on_authorization_change(&self, callback: AuthorizationCallback) {
        let _ = self
            .inner
            .dispatch
            .send(DispatchCommand::RegisterAuthorization(callback));
    }

    fn on_dismiss(&self, kind: EntityKind, id: &str, callback: DismissCallback) {
        let _ = self
            .inner
            .dispatch
            .send(DispatchCommand::RegisterDismiss(kind, id.to_owned(), callback));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use crate::presence::FixedPresence;

    fn config_for(dir: &tempfile::TempDir) -> HostConfig {
        HostConfig::new("com.example.test")
            .with_socket_path(dir.path().join("cove.sock"))
            .with_request_timeout_ms(200)
    }

    #[tokio::test]
    async fn absent_host_fails_without_connecting() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Session::with_presence(config_for(&dir), FixedPresence(false));

        let err = session.host_version().await.expect_err("must fail");
        assert_eq!(err, CoveError::HostNotInstalled);
        assert_eq!(session.link_state(), LinkState::Disconnected);
        assert!(!session.is_host_installed());
    }

    #[tokio::test]
    async fn unreachable_socket_reports_connection_failed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Session::with_presence(config_for(&dir), FixedPresence(true));

        let err = session.host_version().await.expect_err("must fail");
        assert!(matches!(err, CoveError::ConnectionFailed { .. }));
        assert!(err.is_retryable());
        assert_eq!(session.link_state(), LinkState::Disconnected);
    }

    #[tokio::test]
    async fn dismissal_callbacks_fire_once_and_last_registration_wins() {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_dispatcher(rx);

        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let hits = first.clone();
        tx.send(DispatchCommand::RegisterDismiss(
            EntityKind::LiveActivity,
            "timer".into(),
            Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }),
        ))
        .expect("send");

        // Re-registering for the same id replaces the first observer.
        let hits = second.clone();
        tx.send(DispatchCommand::RegisterDismiss(
            EntityKind::LiveActivity,
            "timer".into(),
            Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }),
        ))
        .expect("send");

        tx.send(DispatchCommand::Deliver(HostEvent::ActivityDismissed {
            id: "timer".into(),
        }))
        .expect("send");
        // Second delivery must be a no-op: the callback was consumed.
        tx.send(DispatchCommand::Deliver(HostEvent::ActivityDismissed {
            id: "timer".into(),
        }))
        .expect("send");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dismissal_ids_do_not_collide_across_entity_kinds() {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_dispatcher(rx);

        let activity = Arc::new(AtomicUsize::new(0));
        let widget = Arc::new(AtomicUsize::new(0));

        let hits = activity.clone();
        tx.send(DispatchCommand::RegisterDismiss(
            EntityKind::LiveActivity,
            "shared-id".into(),
            Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }),
        ))
        .expect("send");
        let hits = widget.clone();
        tx.send(DispatchCommand::RegisterDismiss(
            EntityKind::LockScreenWidget,
            "shared-id".into(),
            Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }),
        ))
        .expect("send");

        tx.send(DispatchCommand::Deliver(HostEvent::WidgetDismissed {
            id: "shared-id".into(),
        }))
        .expect("send");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(activity.load(Ordering::SeqCst), 0);
        assert_eq!(widget.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn authorization_observers_all_fire_in_registration_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_dispatcher(rx);

        let order = Arc::new(StdMutex::new(Vec::new()));
        for tag in ["a", "b"] {
            let order = order.clone();
            tx.send(DispatchCommand::RegisterAuthorization(Box::new(
                move |granted| {
                    order
                        .lock()
                        .expect("order mutex")
                        .push((tag, granted));
                },
            )))
            .expect("send");
        }

        tx.send(DispatchCommand::Deliver(HostEvent::AuthorizationChanged {
            granted: false,
        }))
        .expect("send");

        tokio::time::sleep(Duration::from_millis(50)).await;
        let seen = order.lock().expect("order mutex").clone();
        assert_eq!(seen, vec![("a", false), ("b", false)]);
    }
}
