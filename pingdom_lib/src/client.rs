//! HTTP client for the Pingdom REST API.

use crate::config::{default_http_client, ClientConfig, DEFAULT_BASE_URL};
use crate::error::Error;
use crate::response::{decode_body, decode_response, validate_response, Response};
use reqwest::{Client as HttpClient, Method, Request};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

const APP_KEY: &str = "App-Key";
const ACCOUNT_EMAIL: &str = "Account-Email";

/// Query parameters for [`Client::new_request`]. Encoded in key order.
pub type Params = BTreeMap<String, String>;

/// Pingdom API client.
#[derive(Clone)]
pub struct Client {
    user: String,
    password: String,
    api_key: String,
    account_email: Option<String>,
    base_url: Url,
    http: HttpClient,
}

impl Client {
    /// Create a client from `config`.
    ///
    /// Fails only if the base URL (configured or default) does not parse.
    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let base_url = Url::parse(config.base_url())?;
        let account_email = config.account_email().map(String::from);
        let http = config.http_client.unwrap_or_else(default_http_client);
        Ok(Self {
            user: config.user,
            password: config.password,
            api_key: config.api_key,
            account_email,
            base_url,
            http,
        })
    }

    /// Create a client with the default base URL and HTTP client.
    #[deprecated(note = "use Client::with_config; this constructor discards construction errors")]
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_config_lossy(ClientConfig::new(user, password, api_key))
    }

    /// Like [`Client::new`], acting on behalf of the sub-account `account_email`.
    #[deprecated(note = "use Client::with_config; this constructor discards construction errors")]
    pub fn new_multi_user(
        user: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
        account_email: impl Into<String>,
    ) -> Self {
        Self::with_config_lossy(
            ClientConfig::new(user, password, api_key).with_account_email(account_email),
        )
    }

    /// Compatibility path for the legacy constructors: a construction error is
    /// dropped and the client falls back to the default base URL.
    fn with_config_lossy(config: ClientConfig) -> Self {
        match Self::with_config(config.clone()) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "discarding client construction error");
                let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base URL");
                Self {
                    user: config.user,
                    password: config.password,
                    api_key: config.api_key,
                    account_email: config.account_email.filter(|s| !s.is_empty()),
                    base_url,
                    http: config.http_client.unwrap_or_else(default_http_client),
                }
            }
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn account_email(&self) -> Option<&str> {
        self.account_email.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an authenticated request for `resource` (e.g. `"/checks/123"`).
    ///
    /// `method` is an HTTP method such as `GET`, `POST`, `PUT` or `DELETE`; an
    /// empty string means `GET`. When `params` is given it replaces any query
    /// already present in `resource`.
    pub fn new_request(
        &self,
        method: &str,
        resource: &str,
        params: Option<&Params>,
    ) -> Result<Request, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, resource))?;
        if let Some(params) = params {
            let query = encode_query(params);
            url.set_query((!query.is_empty()).then_some(query.as_str()));
        }

        let method = if method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(method.as_bytes())
                .map_err(|_| Error::InvalidMethod(method.to_string()))?
        };

        let mut req = self
            .http
            .request(method, url)
            .basic_auth(&self.user, Some(&self.password))
            .header(APP_KEY, self.api_key.as_str());
        if let Some(email) = &self.account_email {
            req = req.header(ACCOUNT_EMAIL, email.as_str());
        }
        let req = req.build().map_err(Error::Request)?;
        tracing::debug!(method = %req.method(), url = %req.url(), "built request");
        Ok(req)
    }

    /// Send `request` and decode a successful JSON body into `target`.
    ///
    /// On a non-2xx status the error body is decoded into [`Error::Api`] and
    /// `target` is left untouched. Errors raised after the response arrived
    /// carry it (see [`Error::response`]). The body is fully read and released
    /// before this returns.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: Request,
        target: Option<&mut T>,
    ) -> Result<Response, Error> {
        let (response, body) = self.round_trip(request).await?;
        decode_response(&response, &body, target)?;
        Ok(response)
    }

    /// Build, send and decode in one call.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: &str,
        resource: &str,
        params: Option<&Params>,
    ) -> Result<T, Error> {
        let request = self.new_request(method, resource, params)?;
        let (response, body) = self.round_trip(request).await?;
        decode_body(&response, &body)
    }

    async fn round_trip(&self, request: Request) -> Result<(Response, Vec<u8>), Error> {
        let res = self.http.execute(request).await.map_err(Error::Transport)?;
        let response = Response::from_http(&res);
        let body = res.bytes().await.map_err(Error::Transport)?.to_vec();
        tracing::debug!(
            status = response.status.as_u16(),
            url = %response.url,
            bytes = body.len(),
            "received response"
        );
        validate_response(&response, &body)?;
        Ok((response, body))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("account_email", &self.account_email)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    #![allow(deprecated)]

    use super::*;
    use base64::Engine;
    use reqwest::header::AUTHORIZATION;

    fn client() -> Client {
        Client::with_config(ClientConfig::new("u", "p", "k")).unwrap()
    }

    fn basic_auth(req: &Request) -> String {
        let value = req.headers()[AUTHORIZATION].to_str().unwrap();
        let encoded = value.strip_prefix("Basic ").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        String::from_utf8(decoded).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_request_is_authenticated() {
        let req = client().new_request("GET", "/checks", None).unwrap();
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.url().as_str(), "https://api.pingdom.com/api/2.1/checks");
        assert_eq!(basic_auth(&req), "u:p");
        assert_eq!(req.headers()["App-Key"], "k");
        assert!(req.headers().get("Account-Email").is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn account_email_header_only_when_configured() {
        let multi = Client::with_config(
            ClientConfig::new("u", "p", "k").with_account_email("sub@example.com"),
        )
        .unwrap();
        let req = multi.new_request("GET", "/checks", None).unwrap();
        assert_eq!(req.headers()["Account-Email"], "sub@example.com");
        assert_eq!(req.headers().get_all("Account-Email").iter().count(), 1);

        let blank =
            Client::with_config(ClientConfig::new("u", "p", "k").with_account_email("")).unwrap();
        let req = blank.new_request("GET", "/checks", None).unwrap();
        assert!(req.headers().get("Account-Email").is_none());
    }

    #[test]
    fn query_decodes_to_supplied_params() {
        let supplied = params(&[
            ("limit", "25"),
            ("tags", "web, prod"),
            ("name", "a&b=c"),
            ("unicode", "ümlaut/ß"),
            ("empty", ""),
        ]);
        let req = client()
            .new_request("GET", "/checks", Some(&supplied))
            .unwrap();
        let decoded: Params = req.url().query_pairs().into_owned().collect();
        assert_eq!(decoded, supplied);
    }

    #[test]
    fn query_keys_are_sorted() {
        let req = client()
            .new_request("GET", "/results/1", Some(&params(&[("to", "2"), ("from", "1")])))
            .unwrap();
        assert_eq!(req.url().query(), Some("from=1&to=2"));
    }

    #[test]
    fn params_replace_query_in_resource() {
        let c = client();
        let req = c.new_request("GET", "/checks?offset=5", None).unwrap();
        assert_eq!(req.url().query(), Some("offset=5"));

        let req = c
            .new_request("GET", "/checks?offset=5", Some(&Params::new()))
            .unwrap();
        assert_eq!(req.url().query(), None);
    }

    #[test]
    fn methods_pass_through() {
        let c = client();
        for (name, method) in [
            ("GET", Method::GET),
            ("POST", Method::POST),
            ("PUT", Method::PUT),
            ("DELETE", Method::DELETE),
            ("", Method::GET),
        ] {
            let req = c.new_request(name, "/checks/1", None).unwrap();
            assert_eq!(req.method(), method);
        }
    }

    #[test]
    fn invalid_method_is_rejected() {
        let err = client().new_request("GE T", "/checks", None).unwrap_err();
        assert!(matches!(err, Error::InvalidMethod(ref m) if m == "GE T"));
    }

    #[test]
    fn bad_header_value_is_a_request_error() {
        let c = Client::with_config(ClientConfig::new("u", "p", "bad\nkey")).unwrap();
        let err = c.new_request("GET", "/checks", None).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }

    #[test]
    fn custom_base_url_ignores_trailing_slash() {
        for base in ["http://127.0.0.1:8080", "http://127.0.0.1:8080/"] {
            let c = Client::with_config(ClientConfig::new("u", "p", "k").with_base_url(base))
                .unwrap();
            let req = c.new_request("GET", "/checks", None).unwrap();
            assert_eq!(req.url().as_str(), "http://127.0.0.1:8080/checks");
        }
    }

    #[test]
    fn malformed_base_url_fails_construction() {
        let err = Client::with_config(ClientConfig::new("u", "p", "k").with_base_url("not a url"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err =
            Client::with_config(ClientConfig::new("u", "p", "k").with_base_url("http://[::1"))
                .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn empty_base_url_uses_default() {
        let c = Client::with_config(ClientConfig::new("u", "p", "k").with_base_url("")).unwrap();
        assert_eq!(c.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn legacy_constructors_populate_client() {
        let c = Client::new("u", "p", "k");
        assert_eq!(c.user(), "u");
        assert_eq!(c.api_key(), "k");
        assert_eq!(c.account_email(), None);
        assert_eq!(c.base_url().as_str(), DEFAULT_BASE_URL);

        let c = Client::new_multi_user("u", "p", "k", "sub@example.com");
        assert_eq!(c.account_email(), Some("sub@example.com"));
    }

    #[test]
    fn lossy_construction_falls_back_to_default_base_url() {
        let c = Client::with_config_lossy(
            ClientConfig::new("u", "p", "k").with_base_url("::not a url::"),
        );
        assert_eq!(c.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(c.user(), "u");
    }

    #[test]
    fn debug_hides_password() {
        let out = format!("{:?}", Client::with_config(ClientConfig::new("u", "hunter2", "k")).unwrap());
        assert!(!out.contains("hunter2"));
    }
}
