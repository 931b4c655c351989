//! High-level client facade.
//!
//! The client validates descriptors locally, gates presentation on the
//! host's authorization answer, and forwards to whatever [`HostSession`]
//! it was built over. Updates skip the authorization re-check: the host
//! already vetted the entity on presentation and will reject updates for
//! entities it no longer tracks.

use cove_model::{LiveActivityDescriptor, LockScreenWidgetDescriptor, NotchExperienceDescriptor};

use crate::config::HostConfig;
use crate::error::CoveError;
use crate::session::{EntityKind, HostSession, Session};
use crate::version::is_version_compatible;

pub struct Client<S: HostSession> {
    session: S,
}

impl Client<Session> {
    /// Builds a client over a real unix-socket session.
    pub fn connect(config: HostConfig) -> Self {
        Self::new(Session::new(config))
    }
}

impl<S: HostSession> Client<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// True when the shell's bundle is present on disk. Cheap; does not
    /// open a channel.
    pub fn is_host_installed(&self) -> bool {
        self.session.is_host_installed()
    }

    pub async fn host_version(&self) -> Result<String, CoveError> {
        self.session.host_version().await
    }

    /// Checks that the installed shell is at least `minimum_version`.
    pub async fn check_compatibility(&self, minimum_version: &str) -> Result<(), CoveError> {
        let found = self.session.host_version().await?;
        if is_version_compatible(&found, minimum_version) {
            Ok(())
        } else {
            Err(CoveError::IncompatibleVersion {
                required: minimum_version.to_owned(),
                found,
            })
        }
    }

    pub async fn check_authorization(&self) -> Result<bool, CoveError> {
        self.session.check_authorization().await
    }

    /// Asks the host to prompt the user if no decision is on record.
    pub async fn request_authorization(&self) -> Result<bool, CoveError> {
        self.session.request_authorization().await
    }

    /// Observes grant and revocation. Every registered observer fires on
    /// every change, in registration order, for the life of the session.
    pub fn on_authorization_change(&self, callback: impl Fn(bool) + Send + 'static) {
        self.session.on_authorization_change(Box::new(callback));
    }

    pub async fn present_live_activity(
        &self,
        descriptor: &LiveActivityDescriptor,
    ) -> Result<(), CoveError> {
        descriptor.validate()?;
        self.ensure_authorized().await?;
        self.session.present_live_activity(descriptor).await
    }

    pub async fn update_live_activity(
        &self,
        descriptor: &LiveActivityDescriptor,
    ) -> Result<(), CoveError> {
        descriptor.validate()?;
        self.session.update_live_activity(descriptor).await
    }

    pub async fn dismiss_live_activity(&self, id: &str) -> Result<(), CoveError> {
        self.session.dismiss_live_activity(id).await
    }

    /// Best-effort bulk dismissal. Failures are logged and skipped so one
    /// stale id cannot strand the rest.
    pub async fn dismiss_all_live_activities<I, T>(&self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            if let Err(err) = self.session.dismiss_live_activity(id).await {
                log::warn!("cove: dismissing activity {id} failed: {err}");
            }
        }
    }

    /// One-shot observer for a user-initiated dismissal of the activity
    /// with this id. Registering again for the same id replaces the
    /// earlier observer.
    pub fn on_activity_dismiss(&self, id: &str, callback: impl FnOnce() + Send + 'static) {
        self.session
            .on_dismiss(EntityKind::LiveActivity, id, Box::new(callback));
    }

    pub async fn present_lock_screen_widget(
        &self,
        descriptor: &LockScreenWidgetDescriptor,
    ) -> Result<(), CoveError> {
        descriptor.validate()?;
        self.ensure_authorized().await?;
        self.session.present_lock_screen_widget(descriptor).await
    }

    pub async fn update_lock_screen_widget(
        &self,
        descriptor: &LockScreenWidgetDescriptor,
    ) -> Result<(), CoveError> {
        descriptor.validate()?;
        self.session.update_lock_screen_widget(descriptor).await
    }

    pub async fn dismiss_lock_screen_widget(&self, id: &str) -> Result<(), CoveError> {
        self.session.dismiss_lock_screen_widget(id).await
    }

    pub async fn dismiss_all_lock_screen_widgets<I, T>(&self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            if let Err(err) = self.session.dismiss_lock_screen_widget(id).await {
                log::warn!("cove: dismissing widget {id} failed: {err}");
            }
        }
    }

    pub fn on_widget_dismiss(&self, id: &str, callback: impl FnOnce() + Send + 'static) {
        self.session
            .on_dismiss(EntityKind::LockScreenWidget, id, Box::new(callback));
    }

    pub async fn present_notch_experience(
        &self,
        descriptor: &NotchExperienceDescriptor,
    ) -> Result<(), CoveError> {
        descriptor.validate()?;
        self.ensure_authorized().await?;
        self.session.present_notch_experience(descriptor).await
    }

    pub async fn update_notch_experience(
        &self,
        descriptor: &NotchExperienceDescriptor,
    ) -> Result<(), CoveError> {
        descriptor.validate()?;
        self.session.update_notch_experience(descriptor).await
    }

    pub async fn dismiss_notch_experience(&self, id: &str) -> Result<(), CoveError> {
        self.session.dismiss_notch_experience(id).await
    }

    pub async fn dismiss_all_notch_experiences<I, T>(&self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            if let Err(err) = self.session.dismiss_notch_experience(id).await {
                log::warn!("cove: dismissing notch experience {id} failed: {err}");
            }
        }
    }

    pub fn on_notch_experience_dismiss(&self, id: &str, callback: impl FnOnce() + Send + 'static) {
        self.session
            .on_dismiss(EntityKind::NotchExperience, id, Box::new(callback));
    }

    async fn ensure_authorized(&self) -> Result<(), CoveError> {
        if self.session.check_authorization().await? {
            Ok(())
        } else {
            Err(CoveError::NotAuthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use crate::session::{AuthorizationCallback, DismissCallback};
    use cove_model::{
        FontDescriptor, FontWeight, IconDescriptor, WidgetContentElement, WidgetLayoutStyle,
    };

    /// Records every session call by name; programmable authorization
    /// answer and per-id dismissal failures.
    #[derive(Default)]
    struct MockSession {
        calls: Mutex<Vec<String>>,
        authorized: bool,
        failing_ids: Vec<String>,
        version: String,
    }

    impl MockSession {
        fn authorized() -> Self {
            Self {
                authorized: true,
                version: "2.1.0".into(),
                ..Self::default()
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().expect("calls mutex").push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls mutex").clone()
        }

        fn dismiss(&self, name: &str, id: &str) -> Result<(), CoveError> {
            self.record(format!("{name}:{id}"));
            if self.failing_ids.iter().any(|f| f == id) {
                Err(CoveError::ServiceUnavailable)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl HostSession for MockSession {
        fn is_host_installed(&self) -> bool {
            true
        }

        async fn check_authorization(&self) -> Result<bool, CoveError> {
            self.record("check_authorization");
            Ok(self.authorized)
        }

        async fn request_authorization(&self) -> Result<bool, CoveError> {
            self.record("request_authorization");
            Ok(self.authorized)
        }

        async fn host_version(&self) -> Result<String, CoveError> {
            self.record("host_version");
            Ok(self.version.clone())
        }

        async fn present_live_activity(
            &self,
            _descriptor: &LiveActivityDescriptor,
        ) -> Result<(), CoveError> {
            self.record("present_live_activity");
            Ok(())
        }

        async fn update_live_activity(
            &self,
            _descriptor: &LiveActivityDescriptor,
        ) -> Result<(), CoveError> {
            self.record("update_live_activity");
            Ok(())
        }

        async fn dismiss_live_activity(&self, id: &str) -> Result<(), CoveError> {
            self.dismiss("dismiss_live_activity", id)
        }

        async fn present_lock_screen_widget(
            &self,
            _descriptor: &LockScreenWidgetDescriptor,
        ) -> Result<(), CoveError> {
            self.record("present_lock_screen_widget");
            Ok(())
        }

        async fn update_lock_screen_widget(
            &self,
            _descriptor: &LockScreenWidgetDescriptor,
        ) -> Result<(), CoveError> {
            self.record("update_lock_screen_widget");
            Ok(())
        }

        async fn dismiss_lock_screen_widget(&self, id: &str) -> Result<(), CoveError> {
            self.dismiss("dismiss_lock_screen_widget", id)
        }

        async fn present_notch_experience(
            &self,
            _descriptor: &NotchExperienceDescriptor,
        ) -> Result<(), CoveError> {
            self.record("present_notch_experience");
            Ok(())
        }

        async fn update_notch_experience(
            &self,
            _descriptor: &NotchExperienceDescriptor,
        ) -> Result<(), CoveError> {
            self.record("update_notch_experience");
            Ok(())
        }

        async fn dismiss_notch_experience(&self, id: &str) -> Result<(), CoveError> {
            self.dismiss("dismiss_notch_experience", id)
        }

        fn on_authorization_change(&self, _callback: AuthorizationCallback) {
            self.record("on_authorization_change");
        }

        fn on_dismiss(&self, kind: EntityKind, id: &str, _callback: DismissCallback) {
            self.record(format!("on_dismiss:{kind:?}:{id}"));
        }
    }

    fn activity() -> LiveActivityDescriptor {
        LiveActivityDescriptor::new(
            "download-1",
            "com.example.app",
            "Downloading",
            IconDescriptor::symbol("arrow.down.circle"),
        )
    }

    fn widget() -> LockScreenWidgetDescriptor {
        LockScreenWidgetDescriptor::new(
            "clock-1",
            "com.example.app",
            WidgetLayoutStyle::Inline,
            vec![WidgetContentElement::text(
                "12:30",
                FontDescriptor::system(14.0, FontWeight::Medium),
            )],
        )
    }

    #[tokio::test]
    async fn present_checks_authorization_first() {
        let client = Client::new(MockSession::authorized());
        client.present_live_activity(&activity()).await.expect("present");
        assert_eq!(
            client.session().calls(),
            vec!["check_authorization", "present_live_activity"]
        );
    }

    #[tokio::test]
    async fn present_is_refused_when_unauthorized() {
        let client = Client::new(MockSession {
            authorized: false,
            ..MockSession::default()
        });
        let err = client
            .present_live_activity(&activity())
            .await
            .expect_err("must refuse");
        assert_eq!(err, CoveError::NotAuthorized);
        // The descriptor never left the process.
        assert_eq!(client.session().calls(), vec!["check_authorization"]);
    }

    #[tokio::test]
    async fn update_skips_the_authorization_recheck() {
        let client = Client::new(MockSession::authorized());
        client.update_live_activity(&activity()).await.expect("update");
        assert_eq!(client.session().calls(), vec!["update_live_activity"]);
    }

    #[tokio::test]
    async fn invalid_descriptor_fails_before_any_session_call() {
        let client = Client::new(MockSession::authorized());
        let mut bad = activity();
        bad.title.clear();
        let err = client
            .present_live_activity(&bad)
            .await
            .expect_err("must fail");
        assert!(matches!(err, CoveError::InvalidDescriptor { .. }));
        assert!(client.session().calls().is_empty());
    }

    #[tokio::test]
    async fn widget_presentation_validates_and_gates() {
        let client = Client::new(MockSession::authorized());
        client
            .present_lock_screen_widget(&widget())
            .await
            .expect("present");
        assert_eq!(
            client.session().calls(),
            vec!["check_authorization", "present_lock_screen_widget"]
        );
    }

    #[tokio::test]
    async fn dismiss_all_continues_past_failures() {
        let client = Client::new(MockSession {
            failing_ids: vec!["b".into()],
            ..MockSession::authorized()
        });
        client.dismiss_all_live_activities(["a", "b", "c"]).await;
        assert_eq!(
            client.session().calls(),
            vec![
                "dismiss_live_activity:a",
                "dismiss_live_activity:b",
                "dismiss_live_activity:c"
            ]
        );
    }

    #[tokio::test]
    async fn compatibility_check_compares_versions() {
        let client = Client::new(MockSession::authorized());
        client.check_compatibility("2.0").await.expect("compatible");

        let err = client
            .check_compatibility("2.2")
            .await
            .expect_err("too old");
        assert_eq!(
            err,
            CoveError::IncompatibleVersion {
                required: "2.2".into(),
                found: "2.1.0".into()
            }
        );
    }

    #[tokio::test]
    async fn dismiss_observers_are_scoped_by_entity_kind() {
        let client = Client::new(MockSession::authorized());
        client.on_activity_dismiss("x", || {});
        client.on_widget_dismiss("x", || {});
        client.on_notch_experience_dismiss("x", || {});
        assert_eq!(
            client.session().calls(),
            vec![
                "on_dismiss:LiveActivity:x",
                "on_dismiss:LockScreenWidget:x",
                "on_dismiss:NotchExperience:x"
            ]
        );
    }
}
