use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::Date;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub birthday: Option<Date>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub tag_string: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub handle: String,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Contact {
    pub id: String,
    pub person_id: String,
    pub sharing: bool,
    pub receiving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Service {
    pub id: String,
    pub kind: String,
    pub uid: String,
}

/// A third-party app allowed to act on the account.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Authorization {
    pub id: String,
    pub client_name: String,
}

/// A user together with everything onboarding looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub getting_started: bool,
    pub person: Person,
    pub contacts: Vec<Contact>,
    pub followed_tags: Vec<Tag>,
    pub services: Vec<Service>,
    pub authorizations: Vec<Authorization>,
}

impl User {
    pub fn first_name(&self) -> Option<&str> {
        self.person.profile.first_name.as_deref()
    }

    /// Reads the user and its associations as they are right now.
    pub async fn load(db_pool: &SqlitePool, user_id: &str) -> Result<User, sqlx::Error> {
        let (id, username, getting_started): (String, String, bool) =
            sqlx::query_as("SELECT id,username,getting_started FROM users WHERE id=?")
                .bind(user_id)
                .fetch_one(db_pool)
                .await?;

        let (person_id, handle): (String, String) =
            sqlx::query_as("SELECT id,handle FROM people WHERE owner_id=?")
                .bind(&id)
                .fetch_one(db_pool)
                .await?;

        let profile: Profile = sqlx::query_as(
            "SELECT first_name,last_name,image_url,birthday,gender,location,tag_string,bio FROM profiles WHERE person_id=?",
        )
            .bind(&person_id)
            .fetch_optional(db_pool)
            .await?
            .unwrap_or_default();

        let contacts = sqlx::query_as("SELECT id,person_id,sharing,receiving FROM contacts WHERE user_id=?")
            .bind(&id)
            .fetch_all(db_pool)
            .await?;

        let followed_tags = sqlx::query_as(
            "SELECT tags.id,tags.name FROM tags JOIN tag_followings ON tag_followings.tag_id=tags.id WHERE tag_followings.user_id=? ORDER BY tags.name",
        )
            .bind(&id)
            .fetch_all(db_pool)
            .await?;

        let services = sqlx::query_as("SELECT id,kind,uid FROM services WHERE user_id=?")
            .bind(&id)
            .fetch_all(db_pool)
            .await?;

        let authorizations = sqlx::query_as("SELECT id,client_name FROM authorizations WHERE user_id=?")
            .bind(&id)
            .fetch_all(db_pool)
            .await?;

        Ok(User {
            id,
            username,
            getting_started,
            person: Person { id: person_id, handle, profile },
            contacts,
            followed_tags,
            services,
            authorizations,
        })
    }
}

pub async fn update_profile(db_pool: &SqlitePool, person_id: &str, profile: &Profile) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE profiles SET first_name=?,last_name=?,image_url=?,birthday=?,gender=?,location=?,tag_string=?,bio=? WHERE person_id=?",
    )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.image_url)
        .bind(profile.birthday)
        .bind(&profile.gender)
        .bind(&profile.location)
        .bind(&profile.tag_string)
        .bind(&profile.bio)
        .bind(person_id)
        .execute(db_pool)
        .await?;
    Ok(())
}

/// Clears the getting started flag; onboarding is then considered done.
pub async fn finish_getting_started(db_pool: &SqlitePool, user_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET getting_started=0 WHERE id=?")
        .bind(user_id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() == 1)
}
