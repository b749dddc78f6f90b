//! Application Context
//!
//! Owns the router, the document and the services, and turns user events on
//! bound elements into service calls and re-renders.
//!
//! ## Event Flow
//!
//! 1. An event (`click`, `submit`, `input`) hits an element id
//! 2. The bound [`Action`] is looked up in the current document
//! 3. The action runs, possibly through the authenticated dispatcher
//! 4. If the location was pointed at the login view meanwhile, it is followed

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::auth::{AuthError, AuthService};
use crate::contact::{ContactApi, ContactMessage};
use crate::http::{DispatchError, Dispatcher};
use crate::predict::{ModelKind, PredictApi, PredictError, PredictWorkflow, UploadFile};
use crate::router::{Page, Router};
use crate::session::Location;
use crate::ui::components::{error_message, loader, navbar, success_message};
use crate::ui::pages::{self, RenderContext, CONTACT_FIELDS, RESULTS_REGION};
use crate::ui::{components, Action, Dom, Event, Toast, ToastKind, UiError};

pub const LOGIN_REQUIRED: &str = "Please log in to use prediction";

/// UI knobs taken from configuration
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub google_client_id: Option<String>,
    pub downloads_dir: PathBuf,
    pub transition_cooldown: Duration,
    pub toast_duration: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            google_client_id: None,
            downloads_dir: PathBuf::from("."),
            transition_cooldown: Duration::from_millis(600),
            toast_duration: Duration::from_millis(3500),
        }
    }
}

pub struct App {
    settings: AppSettings,
    router: Router,
    dom: Dom,
    location: Location,
    auth: AuthService,
    contact: ContactApi,
    workflow: PredictWorkflow,
}

impl App {
    /// Build the context and render the home page
    pub fn new(dispatcher: Dispatcher, settings: AppSettings) -> Self {
        let dom = Dom::new(settings.transition_cooldown, settings.toast_duration);
        let mut app = Self {
            router: Router::new(),
            dom,
            location: dispatcher.location().clone(),
            auth: AuthService::new(dispatcher.clone()),
            contact: ContactApi::new(dispatcher.clone()),
            workflow: PredictWorkflow::new(PredictApi::new(dispatcher)),
            settings,
        };
        app.render_with_flip(Page::Home);
        app
    }

    pub fn current_page(&self) -> Page {
        self.router.current()
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Current document markup, regions included
    pub fn html(&self) -> String {
        self.dom.html()
    }

    /// Recent toasts, oldest first
    pub fn toasts(&self) -> &[Toast] {
        self.dom.toasts.history()
    }

    pub fn visible_toasts(&self) -> Vec<&Toast> {
        self.dom.toasts.visible_at(Instant::now())
    }

    pub fn scroll_locked(&self) -> bool {
        self.dom.scroll.is_locked_at(Instant::now())
    }

    pub fn workflow(&self) -> &PredictWorkflow {
        &self.workflow
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Navigate to a page, sending unauthenticated visitors of guarded pages
    /// to the login view instead
    pub fn navigate(&mut self, target: Page) {
        if target.requires_auth() && !self.auth.is_authenticated() {
            self.toast(LOGIN_REQUIRED, ToastKind::Error);
            self.render_with_flip(Page::Login);
            return;
        }
        self.render_with_flip(target);
    }

    /// Replace the mount with navbar + page, then bind both
    fn render_with_flip(&mut self, target: Page) {
        let direction = self.router.transition(target);
        self.dom.scroll.lock(Instant::now());

        let ctx = RenderContext {
            logged_in: self.auth.is_authenticated(),
            google_client_id: self.settings.google_client_id.clone(),
        };
        let markup = format!(
            r#"<div class="page">{}<main class="main-content page-content {}">{}</main></div>"#,
            navbar(ctx.logged_in),
            direction.class(),
            pages::render(target, &ctx)
        );

        self.dom.replace(markup);
        components::bind_navbar(&mut self.dom);
        pages::bind(target, &mut self.dom);
    }

    /// Set a form control's value; fires any input listener on it
    pub async fn fill(&mut self, name: &str, value: &str) -> Result<(), UiError> {
        self.dom.set_field(name, value)?;
        if let Some(action) = self.dom.action_for(name, Event::Input) {
            self.run(action).await;
        }
        Ok(())
    }

    /// Attach a dataset to a file input
    pub fn choose_file(&mut self, input_id: &str, file: UploadFile) -> Result<(), UiError> {
        self.dom.set_file(input_id, file)
    }

    pub async fn click(&mut self, element_id: &str) -> Result<(), UiError> {
        self.fire(element_id, Event::Click).await
    }

    pub async fn submit(&mut self, form_id: &str) -> Result<(), UiError> {
        self.fire(form_id, Event::Submit).await
    }

    async fn fire(&mut self, element_id: &str, event: Event) -> Result<(), UiError> {
        if !self.dom.has_element(element_id) {
            return Err(UiError::MissingElement(element_id.to_string()));
        }
        match self.dom.action_for(element_id, event) {
            Some(action) => self.run(action).await,
            None => tracing::debug!("no {:?} listener on #{}", event, element_id),
        }
        Ok(())
    }

    /// Sign-in button callback with a Google ID token
    pub async fn google_credential(&mut self, id_token: &str) {
        match self.auth.google_login_legacy(id_token).await {
            Ok(pair) => {
                if self.save_session(&pair) {
                    self.toast("Logged in via Google!", ToastKind::Success);
                    self.navigate(Page::Predict);
                }
            }
            Err(AuthError::Rejected(detail)) => self.toast(detail, ToastKind::Error),
            Err(e) => {
                tracing::error!("Google login failed: {}", e);
                self.toast("Error connecting to server for Google login.", ToastKind::Error);
            }
        }
    }

    async fn run(&mut self, action: Action) {
        tracing::debug!("action {:?}", action);
        match action {
            Action::Navigate(page) => self.navigate(page),
            Action::Logout => self.auth.logout(),
            Action::SubmitLogin => self.submit_login().await,
            Action::SubmitSignup => self.submit_signup().await,
            Action::SubmitContact => self.submit_contact().await,
            Action::GenerateEda => self.generate_eda().await,
            Action::TrainModel => self.train().await,
            Action::SaveResult => self.save_result().await,
            Action::LoadResults => self.load_results().await,
            Action::EditResult(id) => self.edit_result(id).await,
            Action::DeleteResult(id) => self.delete_result(id).await,
            Action::DownloadResult(id) => self.download_result(id).await,
        }
        self.follow_location();
    }

    /// Follow a location change written by a logout or expired session
    fn follow_location(&mut self) {
        if let Some(fragment) = self.location.take_change() {
            match Page::from_fragment(&fragment) {
                Some(page) => self.navigate(page),
                None => tracing::warn!("ignoring unknown location {}", fragment),
            }
        }
    }

    fn toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.dom.toasts.show(message, kind);
    }

    fn save_session(&mut self, pair: &crate::session::TokenPair) -> bool {
        match self.auth.save_tokens(pair) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to store session: {}", e);
                self.toast(e.to_string(), ToastKind::Error);
                false
            }
        }
    }

    async fn submit_login(&mut self) {
        let username = self.dom.field("username").to_string();
        let password = self.dom.field("password").to_string();

        match self.auth.login(&username, &password).await {
            Ok(pair) => {
                if self.save_session(&pair) {
                    self.toast("Logged in successfully!", ToastKind::Success);
                    self.navigate(Page::Predict);
                }
            }
            Err(AuthError::Rejected(detail)) => self.toast(detail, ToastKind::Error),
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                self.toast("Unexpected error during login.", ToastKind::Error);
            }
        }
    }

    async fn submit_signup(&mut self) {
        let username = self.dom.field("username").to_string();
        let email = self.dom.field("email").to_string();
        let password = self.dom.field("password").to_string();

        match self.auth.signup(&username, &email, &password).await {
            Ok(_) => {
                self.toast("Account created! Please log in.", ToastKind::Success);
                self.navigate(Page::Login);
            }
            Err(e) => self.toast(e.to_string(), ToastKind::Error),
        }
    }

    async fn submit_contact(&mut self) {
        let message = ContactMessage {
            name: self.dom.field("name").to_string(),
            email: self.dom.field("email").to_string(),
            message: self.dom.field("message").to_string(),
        };

        match self.contact.send(&message).await {
            Ok(ack) => {
                self.toast(ack, ToastKind::Success);
                self.dom.reset_fields(&CONTACT_FIELDS);
            }
            Err(e) => self.toast(e.to_string(), ToastKind::Error),
        }
    }

    /// The chosen dataset, or a warning toast if there is none
    fn chosen_file(&mut self) -> Option<UploadFile> {
        let file = self.dom.file("fileInput").cloned();
        if file.is_none() {
            self.toast(PredictError::NoFile.to_string(), ToastKind::Warning);
        }
        file
    }

    /// Show a failed call in its output region; session errors also toast
    fn report_failure(&mut self, region: &str, err: &PredictError) {
        tracing::warn!("{} failed: {}", region, err);
        if let PredictError::Dispatch(dispatch) = err {
            if matches!(dispatch, DispatchError::Transport(_)) || dispatch.is_session_error() {
                self.toast(err.to_string(), ToastKind::Error);
            }
        }
        self.dom.set_region(region, error_message(&err.to_string()));
    }

    async fn generate_eda(&mut self) {
        let Some(file) = self.chosen_file() else {
            return;
        };
        self.dom.set_region("edaOutput", loader());

        let rendered = self
            .workflow
            .generate_eda(&file)
            .await
            .map(|outcome| pages::render_eda_report(&outcome.report));
        match rendered {
            Ok(markup) => {
                self.dom.set_region("edaOutput", markup);
            }
            Err(e) => self.report_failure("edaOutput", &e),
        }
    }

    async fn train(&mut self) {
        let Some(file) = self.chosen_file() else {
            return;
        };
        let model = match self.dom.field("modelSelect").parse::<ModelKind>() {
            Ok(model) => model,
            Err(e) => {
                self.dom.set_region("trainOutput", error_message(&e));
                return;
            }
        };
        self.dom.set_region("trainOutput", loader());

        let rendered = self
            .workflow
            .train(&file, model)
            .await
            .map(pages::render_model_report);
        match rendered {
            Ok(markup) => {
                self.dom.set_region("trainOutput", markup);
            }
            Err(e) => self.report_failure("trainOutput", &e),
        }
    }

    async fn save_result(&mut self) {
        if !self.workflow.has_pending() {
            self.toast(PredictError::NothingToSave.to_string(), ToastKind::Warning);
            return;
        }
        let Some(file) = self.chosen_file() else {
            return;
        };
        let notes = self.dom.field("noteInput").to_string();

        self.dom.set_region("saveOutput", loader());
        self.dom.set_region(RESULTS_REGION, String::new());

        match self.workflow.save(&file.file_name, &notes).await {
            Ok(_) => {
                self.dom
                    .set_region("saveOutput", success_message("Result saved successfully."));
                self.load_results().await;
            }
            Err(e) => self.report_failure("saveOutput", &e),
        }
    }

    async fn load_results(&mut self) {
        let filter = self.dom.field("filterInput").to_string();

        match self.workflow.load_results(&filter).await {
            Ok(results) => {
                self.dom
                    .set_region(RESULTS_REGION, pages::render_result_cards(&results));
                pages::bind_result_cards(&mut self.dom, &results);
            }
            Err(e) => self.report_failure(RESULTS_REGION, &e),
        }
    }

    async fn edit_result(&mut self, id: i64) {
        let notes = self.dom.field(&format!("editNote-{}", id)).to_string();
        match self.workflow.edit_notes(id, &notes).await {
            Ok(()) => {
                self.toast("Notes updated.", ToastKind::Success);
                self.load_results().await;
            }
            Err(e) => self.toast(e.to_string(), ToastKind::Error),
        }
    }

    async fn delete_result(&mut self, id: i64) {
        match self.workflow.delete(id).await {
            Ok(()) => {
                self.toast("Result deleted.", ToastKind::Success);
                self.load_results().await;
            }
            Err(e) => self.toast(e.to_string(), ToastKind::Error),
        }
    }

    async fn download_result(&mut self, id: i64) {
        let dir = self.settings.downloads_dir.clone();
        match self.workflow.download(id, &dir).await {
            Ok(path) => self.toast(format!("Saved {}", path.display()), ToastKind::Success),
            Err(e) => self.toast(e.to_string(), ToastKind::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{LOGIN_PATH, SIGNUP_PATH};
    use crate::http::transport::mock::MockTransport;
    use crate::http::{Transport, REFRESH_PATH};
    use crate::predict::{EDA_PATH, SAVED_RESULTS_PATH, SAVE_RESULT_PATH, TRAIN_PATH};
    use crate::session::{MemoryTokenStore, TokenPair, TokenStore};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct Harness {
        app: App,
        transport: Arc<MockTransport>,
        store: Arc<MemoryTokenStore>,
    }

    fn harness_with(store: MemoryTokenStore, settings: AppSettings) -> Harness {
        let transport = Arc::new(MockTransport::new());
        let store = Arc::new(store);
        let dispatcher = Dispatcher::new(
            "http://api.test",
            transport.clone() as Arc<dyn Transport>,
            store.clone() as Arc<dyn TokenStore>,
            Location::new(),
        );
        Harness {
            app: App::new(dispatcher, settings),
            transport,
            store,
        }
    }

    fn logged_out() -> Harness {
        harness_with(MemoryTokenStore::new(), AppSettings::default())
    }

    fn logged_in() -> Harness {
        harness_with(
            MemoryTokenStore::with_pair(&TokenPair::new("a1", "r1")),
            AppSettings::default(),
        )
    }

    fn csv() -> UploadFile {
        UploadFile::new("sales.csv", b"date,revenue\n2024-01-01,10\n".to_vec())
    }

    #[test]
    fn test_starts_on_home() {
        let h = logged_out();
        assert_eq!(h.app.current_page(), Page::Home);
        assert!(h.app.html().contains("Welcome to the Sales Predictor"));
        assert!(h.app.html().contains("page-flip-right"));
        assert!(h.app.scroll_locked());
    }

    #[test]
    fn test_navigating_to_current_page_rerenders() {
        let mut h = logged_out();
        h.app.navigate(Page::About);
        let before = h.app.dom().render_count();
        let html = h.app.html();

        h.app.navigate(Page::About);

        assert_eq!(h.app.dom().render_count(), before + 1);
        assert_eq!(h.app.html(), html.replace("page-flip-left", "page-flip-right"));
        assert_eq!(
            h.app.dom().action_for("home-link", Event::Click),
            Some(Action::Navigate(Page::Home))
        );
    }

    #[test]
    fn test_guarded_predict_redirects_to_login() {
        let mut h = logged_out();
        h.app.navigate(Page::Predict);

        assert_eq!(h.app.current_page(), Page::Login);
        let html = h.app.html();
        assert!(html.contains(r#"id="loginForm""#));
        assert!(!html.contains("fileInput"));

        let toasts = h.app.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, LOGIN_REQUIRED);
        assert_eq!(toasts[0].kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_login_rejected_shows_detail() {
        let mut h = logged_out();
        h.transport.respond(LOGIN_PATH, 401, json!({"detail": "bad creds"}));

        h.app.click("login-link").await.unwrap();
        h.app.fill("username", "alice").await.unwrap();
        h.app.fill("password", "wrong").await.unwrap();
        h.app.submit("loginForm").await.unwrap();

        assert!(h.app.toasts().iter().any(|t| t.message.contains("bad creds")));
        assert!(!h.store.is_authenticated());
        assert_eq!(h.app.current_page(), Page::Login);
    }

    #[tokio::test]
    async fn test_login_then_predict_shows_upload() {
        let mut h = logged_out();
        h.transport.respond(LOGIN_PATH, 200, json!({"access": "a1", "refresh": "r1"}));

        h.app.click("login-link").await.unwrap();
        h.app.fill("username", "alice").await.unwrap();
        h.app.fill("password", "secret").await.unwrap();
        h.app.submit("loginForm").await.unwrap();

        assert_eq!(h.store.access().unwrap().as_deref(), Some("a1"));
        assert_eq!(h.app.toasts()[0].message, "Logged in successfully!");
        assert_eq!(h.app.current_page(), Page::Predict);

        h.app.click("home-link").await.unwrap();
        h.app.click("predict-link").await.unwrap();
        assert!(h.app.html().contains(r#"<input type="file" id="fileInput" />"#));
        assert!(h.app.html().contains(r#"id="logout-link""#));
    }

    #[tokio::test]
    async fn test_login_transport_failure() {
        let mut h = logged_out();
        h.transport
            .fail(LOGIN_PATH, crate::http::TransportError::Unavailable);

        h.app.navigate(Page::Login);
        h.app.submit("loginForm").await.unwrap();

        assert_eq!(h.app.toasts()[0].message, "Unexpected error during login.");
    }

    #[tokio::test]
    async fn test_signup_success_lands_on_login() {
        let mut h = logged_out();
        h.transport.respond(SIGNUP_PATH, 201, json!({"id": 1}));

        h.app.click("signup-link").await.unwrap();
        h.app.fill("username", "bob").await.unwrap();
        h.app.fill("email", "b@x.com").await.unwrap();
        h.app.fill("password", "pw").await.unwrap();
        h.app.submit("signupForm").await.unwrap();

        let toast = &h.app.toasts()[0];
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Account created! Please log in.");
        assert_eq!(h.app.current_page(), Page::Login);
    }

    #[tokio::test]
    async fn test_signup_field_errors() {
        let mut h = logged_out();
        h.transport.respond(
            SIGNUP_PATH,
            400,
            json!({"username": ["A user with that username already exists."]}),
        );

        h.app.navigate(Page::Signup);
        h.app.submit("signupForm").await.unwrap();

        assert_eq!(
            h.app.toasts()[0].message,
            "A user with that username already exists."
        );
        assert_eq!(h.app.current_page(), Page::Signup);
    }

    #[tokio::test]
    async fn test_inline_links_switch_auth_pages() {
        let mut h = logged_out();
        h.app.navigate(Page::Login);
        h.app.click("to-signup-inline").await.unwrap();
        assert_eq!(h.app.current_page(), Page::Signup);
        h.app.click("to-login-inline").await.unwrap();
        assert_eq!(h.app.current_page(), Page::Login);
    }

    #[tokio::test]
    async fn test_logout_follows_location() {
        let mut h = logged_in();
        h.app.navigate(Page::Predict);

        h.app.click("logout-link").await.unwrap();

        assert!(!h.store.is_authenticated());
        assert_eq!(h.app.current_page(), Page::Login);
        assert!(h.app.html().contains(r#"id="login-link""#));
    }

    #[tokio::test]
    async fn test_expired_session_during_eda_lands_on_login() {
        let mut h = logged_in();
        h.transport.respond(EDA_PATH, 401, json!({"detail": "expired"}));
        h.transport.respond(REFRESH_PATH, 401, json!({"detail": "invalid"}));

        h.app.navigate(Page::Predict);
        h.app.choose_file("fileInput", csv()).unwrap();
        h.app.click("edaBtn").await.unwrap();

        assert!(!h.store.is_authenticated());
        assert_eq!(h.app.current_page(), Page::Login);
        assert!(h
            .app
            .toasts()
            .iter()
            .any(|t| t.message == "Session expired, please log in again."));
    }

    #[tokio::test]
    async fn test_eda_without_file_warns() {
        let mut h = logged_in();
        h.app.navigate(Page::Predict);

        h.app.click("edaBtn").await.unwrap();

        assert_eq!(h.app.toasts()[0].kind, ToastKind::Warning);
        assert_eq!(h.app.toasts()[0].message, "Upload a CSV file first.");
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_eda_and_train_fill_regions() {
        let mut h = logged_in();
        h.transport.respond(
            EDA_PATH,
            200,
            json!({"shape": [2, 2], "columns": ["date", "revenue"], "inferred_target": "revenue"}),
        );
        h.transport.respond(TRAIN_PATH, 500, json!({"error": "Target column has no variance"}));

        h.app.navigate(Page::Predict);
        h.app.choose_file("fileInput", csv()).unwrap();
        h.app.click("edaBtn").await.unwrap();
        h.app.fill("modelSelect", "lightgbm").await.unwrap();
        h.app.click("trainBtn").await.unwrap();

        assert!(h.app.dom().region("edaOutput").contains("2 rows, 2 columns"));
        assert!(h
            .app
            .dom()
            .region("trainOutput")
            .contains("Target column has no variance"));
        assert!(h.app.workflow().last_model().is_none());
    }

    #[tokio::test]
    async fn test_save_then_manage_results() {
        let dir = tempdir().unwrap();
        let settings = AppSettings {
            downloads_dir: dir.path().to_path_buf(),
            ..AppSettings::default()
        };
        let mut h = harness_with(MemoryTokenStore::with_pair(&TokenPair::new("a1", "r1")), settings);
        let listing = json!({"results": [
            {"id": 3, "file_name": "sales.csv", "created_at": "2024-05-01T10:00:00Z", "notes": "v1"}
        ]});
        h.transport.respond(TRAIN_PATH, 200, json!({"target_column": "revenue", "rmse": 1.0}));
        h.transport.respond(SAVE_RESULT_PATH, 201, json!({"message": "Result saved successfully.", "id": 3}));
        h.transport.respond(SAVED_RESULTS_PATH, 200, listing.clone());
        h.transport.respond("/edit/3/", 200, json!({"message": "Updated successfully"}));
        h.transport.respond(SAVED_RESULTS_PATH, 200, listing);
        h.transport.respond("/download/3/", 200, json!({"id": 3, "notes": "v2"}));

        h.app.navigate(Page::Predict);
        h.app.choose_file("fileInput", csv()).unwrap();
        h.app.click("trainBtn").await.unwrap();
        h.app.fill("noteInput", "first run").await.unwrap();
        h.app.click("saveBtn").await.unwrap();

        assert!(h.app.dom().region("saveOutput").contains("Result saved successfully."));
        assert!(h.app.dom().region(RESULTS_REGION).contains(r#"id="edit-3""#));
        assert_eq!(h.app.dom().field("editNote-3"), "v1");

        h.app.fill("editNote-3", "v2").await.unwrap();
        h.app.click("edit-3").await.unwrap();
        assert!(h.app.toasts().iter().any(|t| t.message == "Notes updated."));
        let edit = &h.transport.requests_to("/edit/3/")[0];
        assert_eq!(edit.body, crate::http::RequestBody::Json(json!({"notes": "v2"})));

        h.app.click("download-3").await.unwrap();
        assert!(dir.path().join("result_3.json").exists());
    }

    #[tokio::test]
    async fn test_save_without_result_warns() {
        let mut h = logged_in();
        h.app.navigate(Page::Predict);
        h.app.choose_file("fileInput", csv()).unwrap();

        h.app.click("saveBtn").await.unwrap();

        assert_eq!(
            h.app.toasts()[0].message,
            "Generate EDA or train a model first before saving."
        );
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_filter_input_reloads_results() {
        let mut h = logged_in();
        h.transport.respond(
            SAVED_RESULTS_PATH,
            200,
            json!({"results": [
                {"id": 1, "file_name": "sales.csv", "created_at": "2024-01-01T00:00:00"},
                {"id": 2, "file_name": "stock.csv", "created_at": "2024-02-01T00:00:00"}
            ]}),
        );

        h.app.navigate(Page::Predict);
        h.app.fill("filterInput", "stock").await.unwrap();

        let region = h.app.dom().region(RESULTS_REGION);
        assert!(region.contains("stock.csv"));
        assert!(!region.contains("sales.csv"));
    }

    #[tokio::test]
    async fn test_contact_clears_form() {
        let mut h = logged_out();
        h.transport.respond("/api/contact/", 200, json!({"message": "Thanks!"}));

        h.app.click("contact-link").await.unwrap();
        h.app.fill("name", "Ann").await.unwrap();
        h.app.fill("email", "ann@example.com").await.unwrap();
        h.app.fill("message", "Hi").await.unwrap();
        h.app.submit("contactForm").await.unwrap();

        assert_eq!(h.app.toasts()[0].message, "Thanks!");
        assert_eq!(h.app.dom().field("name"), "");
    }

    #[tokio::test]
    async fn test_google_credential_logs_in() {
        let settings = AppSettings {
            google_client_id: Some("cid".into()),
            ..AppSettings::default()
        };
        let mut h = harness_with(MemoryTokenStore::new(), settings);
        h.transport.respond(
            "/api/auth/google-login/",
            200,
            json!({"access_token": "ga", "refresh_token": "gr"}),
        );

        h.app.navigate(Page::Login);
        assert!(h.app.html().contains(r#"id="google-signin""#));
        h.app.google_credential("id-token").await;

        assert_eq!(h.store.refresh().unwrap().as_deref(), Some("gr"));
        assert_eq!(h.app.current_page(), Page::Predict);
    }

    #[tokio::test]
    async fn test_missing_element_is_an_error() {
        let mut h = logged_out();
        assert_eq!(
            h.app.click("logout-link").await,
            Err(UiError::MissingElement("logout-link".into()))
        );
        assert!(h.app.fill("fileInput", "x").await.is_err());
    }
}
