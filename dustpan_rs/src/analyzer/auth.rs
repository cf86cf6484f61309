//! Authentication providers and mechanisms a project relies on.
//!
//! Presence only: manifests are matched by dependency name, source and markup
//! files by package imports and signature substrings.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::SourceFile;

use super::classify::{is_manifest, is_markup, is_script};

/// A provider or mechanism label with the packages and code signatures that
/// reveal it. Packages ending in `/` match a whole scope.
struct Signature {
    label: &'static str,
    packages: &'static [&'static str],
    snippets: &'static [&'static str],
}

const PROVIDERS: &[Signature] = &[
    Signature {
        label: "NextAuth",
        packages: &["next-auth", "@auth/core", "@auth/nextjs"],
        snippets: &["NextAuth(", "getServerSession("],
    },
    Signature {
        label: "Auth0",
        packages: &["@auth0/", "auth0-js", "auth0"],
        snippets: &["Auth0Provider", "useAuth0(", "createAuth0Client("],
    },
    Signature {
        label: "Firebase Auth",
        packages: &["firebase/auth", "@firebase/auth", "react-firebase-hooks/auth"],
        snippets: &["signInWithPopup(", "signInWithEmailAndPassword(", "onAuthStateChanged("],
    },
    Signature {
        label: "Supabase Auth",
        packages: &["@supabase/auth-helpers-nextjs", "@supabase/auth-helpers-react", "@supabase/auth-ui-react"],
        snippets: &["supabase.auth.", ".auth.signInWithPassword(", ".auth.getUser("],
    },
    Signature {
        label: "Clerk",
        packages: &["@clerk/"],
        snippets: &["ClerkProvider", "useUser(", "SignedIn"],
    },
    Signature {
        label: "Google OAuth",
        packages: &["@react-oauth/google", "react-google-login", "google-auth-library", "passport-google-oauth20"],
        snippets: &["GoogleOAuthProvider", "accounts.google.com/o/oauth2", "gapi.auth2"],
    },
    Signature {
        label: "GitHub OAuth",
        packages: &["passport-github2", "passport-github", "@octokit/auth-oauth-app"],
        snippets: &["github.com/login/oauth"],
    },
    Signature {
        label: "AWS Cognito",
        packages: &["amazon-cognito-identity-js", "@aws-amplify/auth", "@aws-amplify/ui-react"],
        snippets: &["CognitoUserPool", "withAuthenticator"],
    },
    Signature {
        label: "Okta",
        packages: &["@okta/"],
        snippets: &["OktaAuth"],
    },
    Signature {
        label: "Microsoft MSAL",
        packages: &["@azure/msal-browser", "@azure/msal-react", "@azure/msal-node"],
        snippets: &["PublicClientApplication", "MsalProvider"],
    },
    Signature {
        label: "Keycloak",
        packages: &["keycloak-js", "@react-keycloak/"],
        snippets: &["new Keycloak("],
    },
    Signature {
        label: "Magic",
        packages: &["magic-sdk", "@magic-sdk/", "@magic-ext/"],
        snippets: &["new Magic("],
    },
    Signature {
        label: "Passport",
        packages: &["passport", "passport-local", "passport-jwt"],
        snippets: &["passport.authenticate(", "passport.use("],
    },
    Signature {
        label: "Lucia",
        packages: &["lucia", "@lucia-auth/"],
        snippets: &[],
    },
];

const MECHANISMS: &[Signature] = &[
    Signature {
        label: "cookie",
        packages: &["js-cookie", "cookie-parser", "universal-cookie", "react-cookie"],
        snippets: &["document.cookie", "Cookies.get(", "Cookies.set(", "cookies()", "res.cookie(", "withCredentials", "credentials: 'include'", "credentials: \"include\""],
    },
    Signature {
        label: "bearer",
        packages: &[],
        snippets: &["Bearer ", "`Bearer ${"],
    },
    Signature {
        label: "session",
        packages: &["express-session", "iron-session", "cookie-session"],
        snippets: &["useSession(", "getSession(", "getServerSession(", "req.session"],
    },
    Signature {
        label: "jwt",
        packages: &["jsonwebtoken", "jwt-decode", "jose", "express-jwt", "passport-jwt"],
        snippets: &["jwt.sign(", "jwt.verify(", "jwtDecode(", "jwtVerify("],
    },
    Signature {
        label: "basic",
        packages: &["express-basic-auth", "basic-auth"],
        snippets: &["'Basic '", "\"Basic \"", "`Basic ${"],
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthReport {
    pub providers: BTreeSet<String>,
    pub auth_types: BTreeSet<String>,
    /// Files each provider was seen in.
    pub evidence: BTreeMap<String, BTreeSet<String>>,
}

pub fn detect_auth(files: &[SourceFile]) -> AuthReport {
    let mut report = AuthReport::default();
    for file in files {
        let manifest = if is_manifest(file) {
            Some(manifest_dependencies(&file.content))
        } else if is_script(file) || is_markup(file) {
            None
        } else {
            continue;
        };
        let matches = |sig: &Signature| match &manifest {
            Some(deps) => manifest_matches(deps, &file.content, sig),
            None => source_matches(&file.content, sig),
        };

        for sig in PROVIDERS.iter().filter(|sig| matches(sig)) {
            report.providers.insert(sig.label.to_string());
            report
                .evidence
                .entry(sig.label.to_string())
                .or_default()
                .insert(file.path.clone());
        }
        for sig in MECHANISMS.iter().filter(|sig| matches(sig)) {
            report.auth_types.insert(sig.label.to_string());
        }
    }
    report
}

/// Dependency names from every dependency table, or `None` when the manifest
/// is not valid JSON.
fn manifest_dependencies(raw: &str) -> Option<BTreeSet<String>> {
    let manifest: Value = serde_json::from_str(raw).ok()?;
    let mut names = BTreeSet::new();
    for table in [
        "dependencies",
        "devDependencies",
        "peerDependencies",
        "optionalDependencies",
    ] {
        if let Some(deps) = manifest.get(table).and_then(Value::as_object) {
            names.extend(deps.keys().cloned());
        }
    }
    Some(names)
}

fn package_matches(dependency: &str, package: &str) -> bool {
    if package.ends_with('/') {
        dependency.starts_with(package)
    } else {
        dependency == package
    }
}

fn manifest_matches(deps: &Option<BTreeSet<String>>, raw: &str, sig: &Signature) -> bool {
    match deps {
        Some(deps) => sig
            .packages
            .iter()
            .any(|pkg| deps.iter().any(|dep| package_matches(dep, pkg))),
        None => sig.packages.iter().any(|pkg| {
            if pkg.ends_with('/') {
                raw.contains(&format!("\"{pkg}"))
            } else {
                raw.contains(&format!("\"{pkg}\""))
            }
        }),
    }
}

fn source_matches(content: &str, sig: &Signature) -> bool {
    sig.packages.iter().any(|pkg| imports_package(content, pkg))
        || sig.snippets.iter().any(|snippet| content.contains(snippet))
}

/// A quoted module specifier naming `package` or one of its subpaths.
fn imports_package(content: &str, package: &str) -> bool {
    ['\'', '"', '`'].iter().any(|quote| {
        if package.ends_with('/') {
            content.contains(&format!("{quote}{package}"))
        } else {
            content.contains(&format!("{quote}{package}{quote}"))
                || content.contains(&format!("{quote}{package}/"))
        }
    })
}
