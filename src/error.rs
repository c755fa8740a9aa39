use std::fmt;

use failure::Fail;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every remote call the dashboard knows about, used to label errors and logs.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Operation {
    Login,
    RegisterStudent,
    RegisterTeacher,
    ReferenceData,
    ClassStats,
    AddSubjects,
    AddDepartments,
    UploadMarks,
    Queries,
    RespondToQuery,
    SetFaMode,
    FaModeStatus,
    DebugData
}

impl Operation {
    pub fn failure_message(&self) -> &'static str {
        use Operation::*; // Without this, in the match we must write "Operation::Login, ..."

        match self {
            Login => "Login failed. Please try again.",
            RegisterStudent | RegisterTeacher => "Registration failed. Please try again.",
            ReferenceData => "Failed to fetch initial data",
            ClassStats => "Failed to fetch class stats",
            AddSubjects => "Failed to add subjects",
            AddDepartments => "Failed to add departments",
            UploadMarks => "Failed to upload marks",
            Queries => "Failed to fetch queries",
            RespondToQuery => "Failed to respond to query",
            SetFaMode => "Failed to set FA mode",
            FaModeStatus => "Failed to get FA mode status",
            DebugData => "Failed to fetch debug data"
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.failure_message())
    }
}

#[derive(Debug, Fail)]
pub enum ApiError {
    #[fail(display = "{}", operation)]
    Http {
        operation: Operation,
        error: reqwest::Error
    },

    #[fail(display = "{}", operation)]
    Rejected {
        operation: Operation,
        status: u16,
        message: Option<String> // Only if the server answered with a JSON body holding one
    },

    #[fail(display = "{}", operation)]
    Remote {
        operation: Operation,
        error: serde_json::Error,
        response: String
    }
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        use ApiError::*;

        match self {
            Http { operation, .. } | Rejected { operation, .. } | Remote { operation, .. } => *operation
        }
    }

    /// The message the server attached to a rejected request, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message: Some(m), .. } => Some(m),
            _ => None
        }
    }

    pub fn to_detailed_string(&self) -> String {
        use ApiError::*;

        let mut result = String::new();
        result += &self.to_string();

        match self {
            Http { error, .. } => {
                result += &format!(", reqwest dropped error '{}'", error);
            },
            Rejected { status, message, .. } => {
                result += &format!(" (HTTP {})", status);

                if let Some(m) = message {
                    result += &format!(" : {}", m);
                }
            },
            Remote { error, response, .. } => {
                result += &format!(". Serde dropped error '{}' while parsing response :\n{}", error, response);
            }
        }

        result
    }
}
