/*
 * Teacher Dashboard, keeping class tracking organized
 * Copyright (C) 2019-2020 Adrien 'Litarvan' Navratil
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use failure::Fail;
use log::{info, warn};
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

use crate::sync::StateLock;

pub mod guard;

/// Key the signed-in user is stored under, same as the browser app used.
pub const SESSION_KEY: &str = "user";

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Role {
    #[serde(alias = "student", alias = "STUDENT")]
    Student,
    #[serde(alias = "teacher", alias = "TEACHER")]
    Teacher,
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin
}

impl Default for Role {
    fn default() -> Role {
        Role::Student
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Admin => "Admin"
        })
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> SessionResult<Role> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            _ => Err(SessionError::UnknownRole { role: s.to_string() })
        }
    }
}

/// The signed-in user, as the auth service described it (minus the password).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub role: Role,

    #[serde(flatten)]
    pub profile: Map<String, Value>
}

impl Session {
    pub fn from_user(user: Value) -> SessionResult<Session> {
        let user = match user {
            Value::Object(mut fields) => {
                fields.remove("password");
                Value::Object(fields)
            },
            other => other
        };

        Ok(serde_json::from_value(user)?)
    }

    /// Letter shown in the avatar bubble
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role.to_string().to_lowercase())
    }
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> SessionResult<Option<Session>>;
    fn save(&self, session: &Session) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Keeps the session in a small JSON document on disk, `{ "user": { ... } }`.
pub struct FileSessionStore {
    path: PathBuf
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> FileSessionStore {
        FileSessionStore {
            path: path.as_ref().to_path_buf()
        }
    }

    fn read_document(&self) -> SessionResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(document) => Ok(document),
            _ => Ok(Map::new())
        }
    }

    fn write_document(&self, document: Map<String, Value>) -> SessionResult<()> {
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(document))?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionResult<Option<Session>> {
        let document = match self.read_document() {
            Ok(d) => d,
            Err(SessionError::FormatError { error }) => {
                warn!("Session file at '{}' is corrupted, ignoring it : {}", self.path.display(), error);
                return Ok(None);
            },
            Err(e) => return Err(e)
        };

        match document.get(SESSION_KEY) {
            Some(user) => match serde_json::from_value::<Session>(user.clone()) {
                Ok(s) => Ok(Some(s)),
                Err(e) => {
                    warn!("Stored session is invalid, ignoring it : {}", e);
                    Ok(None)
                }
            },
            None => Ok(None)
        }
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        let mut document = self.read_document().unwrap_or_default();
        document.insert(SESSION_KEY.to_string(), serde_json::to_value(session)?);

        self.write_document(document)?;
        info!("Saved session of {}", session);

        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut document = self.read_document().unwrap_or_default();
        if document.remove(SESSION_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }

        self.write_document(document)
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>
}

impl MemorySessionStore {
    pub fn new() -> MemorySessionStore {
        MemorySessionStore::default()
    }

    pub fn with(session: Session) -> MemorySessionStore {
        MemorySessionStore {
            slot: Mutex::new(Some(session))
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionResult<Option<Session>> {
        Ok(self.slot.state().clone())
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        *self.slot.state() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot.state() = None;
        Ok(())
    }
}

#[derive(Debug, Fail)]
pub enum SessionError {
    #[fail(display = "Can't access the session file : {}", error)]
    IOError {
        error: std::io::Error
    },

    #[fail(display = "Session record isn't valid JSON or misses a field : {}", error)]
    FormatError {
        error: serde_json::Error
    },

    #[fail(display = "Unknown role '{}'", role)]
    UnknownRole {
        role: String
    }
}

from_error!(std::io::Error, SessionError, IOError);
from_error!(serde_json::Error, SessionError, FormatError);

#[cfg(test)]
pub(crate) fn teacher() -> Session {
    Session::from_user(serde_json::json!({
        "name": "Meera Kulkarni",
        "role": "Teacher",
        "email": "meera@college.edu"
    })).unwrap()
}
