//! Authentication gate and login form.

use crate::nav::{Route, View};
use roster_core::LoginRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginFocus {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginFocus,
    pub error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Username,
        };
    }

    pub fn input_mut(&mut self) -> &mut String {
        match self.focus {
            LoginFocus::Username => &mut self.username,
            LoginFocus::Password => &mut self.password,
        }
    }

    /// Password rendered as bullets.
    pub fn masked_password(&self) -> String {
        "•".repeat(self.password.chars().count())
    }
}

/// Routes every view through the authentication state.
#[derive(Debug, Clone)]
pub struct Shell {
    authenticated: bool,
    pub login: LoginForm,
}

impl Shell {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            login: LoginForm::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Unauthenticated users only ever see the login view.
    pub fn route(&self, requested: View) -> Route {
        if self.authenticated {
            Route::View(requested)
        } else {
            Route::Login
        }
    }

    pub fn begin_login(&mut self) -> Option<LoginRequest> {
        let form = &mut self.login;
        if form.submitting {
            return None;
        }
        if form.username.trim().is_empty() || form.password.is_empty() {
            form.error = Some("Username and password are required".to_string());
            return None;
        }
        form.submitting = true;
        form.error = None;
        Some(LoginRequest {
            username: form.username.trim().to_string(),
            password: form.password.clone(),
        })
    }

    pub fn login_succeeded(&mut self) {
        self.authenticated = true;
        self.login = LoginForm::default();
    }

    /// Keep the username so the user only retypes the password.
    pub fn login_failed(&mut self, message: impl Into<String>) {
        self.authenticated = false;
        self.login.submitting = false;
        self.login.password.clear();
        self.login.focus = LoginFocus::Password;
        self.login.error = Some(message.into());
    }

    pub fn logged_out(&mut self) {
        self.authenticated = false;
        self.login = LoginForm::default();
    }
}
