use serde::Deserialize;

use crate::{error::Error, prelude::*};

/// Account entry as configured, either field may be missing.
#[derive(Clone, Default, Deserialize, derive_more::Debug)]
pub struct Account {
    #[serde(rename = "RSA_USER_ID", alias = "id")]
    pub id: Option<String>,

    #[serde(rename = "RSA_USER_PWD", alias = "password")]
    #[debug(skip)]
    pub password: Option<String>,
}

impl Account {
    /// Both fields, if present and non-blank.
    pub fn credential(&self) -> Option<Credential<'_>> {
        let id = self.id.as_deref().filter(|id| !id.trim().is_empty())?;
        let password = self.password.as_deref().filter(|password| !password.is_empty())?;
        Some(Credential { id, password })
    }
}

#[derive(Copy, Clone, derive_more::Debug)]
pub struct Credential<'a> {
    pub id: &'a str,

    #[debug(skip)]
    pub password: &'a str,
}

/// Resolve the account list: a JSON list takes precedence over the single pair.
pub fn resolve(
    accounts_json: Option<&str>,
    user_id: Option<String>,
    password: Option<String>,
) -> Result<Vec<Account>, Error> {
    if let Some(json) = accounts_json {
        let accounts: Vec<Account> = serde_json::from_str(json)
            .map_err(|error| Error::StartupConfig(format!("`ACCOUNTS` is not a valid list: {error}")))?;
        if accounts.is_empty() {
            return Err(Error::StartupConfig("`ACCOUNTS` is empty".to_owned()));
        }
        Ok(accounts)
    } else if user_id.is_some() || password.is_some() {
        Ok(vec![Account { id: user_id, password }])
    } else {
        Err(Error::StartupConfig(
            "either `ACCOUNTS` or `RSA_USER_ID` and `RSA_USER_PWD` must be set".to_owned(),
        ))
    }
}
