use serde::Serialize;

use crate::users::User;

use super::OnboardingConfig;

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.trim().is_empty())
}

/// Answers which getting started steps a user has already done.
/// Every call reads the user as given; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct GettingStarted<'a> {
    config: &'a OnboardingConfig,
    user: &'a User,
}

impl<'a> GettingStarted<'a> {
    pub fn new(config: &'a OnboardingConfig, user: &'a User) -> Self {
        Self { config, user }
    }

    /// All eight profile fields offered during getting started are filled.
    pub fn has_completed_profile(&self) -> bool {
        let profile = &self.user.person.profile;

        present(&profile.first_name)
            && present(&profile.last_name)
            && present(&profile.image_url)
            && profile.birthday.is_some()
            && present(&profile.gender)
            && present(&profile.location)
            && present(&profile.tag_string)
            && present(&profile.bio)
    }

    /// True when nothing is left to connect: either a service is connected
    /// or the pod offers none.
    pub fn has_connected_services(&self) -> bool {
        !self.user.services.is_empty() || self.config.configured_services().is_empty()
    }

    /// More than two contacts.
    pub fn has_few_contacts(&self) -> bool {
        self.user.contacts.len() > 2
    }

    /// More than two followed tags.
    pub fn has_few_followed_tags(&self) -> bool {
        self.user.followed_tags.len() > 2
    }

    pub fn has_connected_cubbies(&self) -> bool {
        !self.user.authorizations.is_empty()
    }

    pub fn has_completed_getting_started(&self) -> bool {
        !self.user.getting_started
    }

    pub fn welcome_text(&self) -> String {
        match self.user.first_name().map(str::trim) {
            Some(first_name) if !first_name.is_empty() => format!("Welcome, {first_name}!"),
            _ => "Welcome!".to_owned(),
        }
    }

    pub fn status(&self) -> OnboardingStatus {
        OnboardingStatus {
            welcome_text: self.welcome_text(),
            has_completed_profile: self.has_completed_profile(),
            has_connected_services: self.has_connected_services(),
            has_few_contacts: self.has_few_contacts(),
            has_few_followed_tags: self.has_few_followed_tags(),
            has_connected_cubbies: self.has_connected_cubbies(),
            has_completed_getting_started: self.has_completed_getting_started(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingStatus {
    pub welcome_text: String,
    pub has_completed_profile: bool,
    pub has_connected_services: bool,
    pub has_few_contacts: bool,
    pub has_few_followed_tags: bool,
    pub has_connected_cubbies: bool,
    pub has_completed_getting_started: bool,
}
