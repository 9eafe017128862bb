//! Sign in, sign up, sign out.

use homecraft_client::{Storefront, Transport};
use homecraft_core::{Credentials, Registration};

use crate::error::{CommandError, CommandResult};

pub async fn login<T: Transport>(
    app: &Storefront<T>,
    email: String,
    password: String,
    from: Option<&str>,
) -> CommandResult<()> {
    app.login(&Credentials::new(email, password))
        .await
        .map_err(|e| CommandError::rejected(e, app.session().error()))?;

    greet(app);
    if let Some(destination) = app.session().post_login_destination(from) {
        println!("Continue at {destination}");
    }
    Ok(())
}

pub async fn register<T: Transport>(
    app: &Storefront<T>,
    name: String,
    email: String,
    password: String,
) -> CommandResult<()> {
    let registration = Registration {
        name,
        email,
        password,
    };
    app.register(&registration)
        .await
        .map_err(|e| CommandError::rejected(e, app.session().error()))?;

    greet(app);
    Ok(())
}

pub fn logout<T: Transport>(app: &Storefront<T>) -> CommandResult<()> {
    app.logout();
    println!("Signed out.");
    Ok(())
}

pub fn whoami<T: Transport>(app: &Storefront<T>) -> CommandResult<()> {
    if !app.session().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }

    match app.session().user() {
        Some(user) => {
            let role = if user.is_admin { "admin" } else { "customer" };
            match &user.email {
                Some(email) => println!("{} <{}> ({role})", user.display_name(), email),
                None => println!("{} ({role})", user.display_name()),
            }
        }
        None => println!("Signed in (no profile stored)"),
    }
    Ok(())
}

fn greet<T: Transport>(app: &Storefront<T>) {
    if let Some(user) = app.session().user() {
        println!("Signed in as {}", user.display_name());
    }
}
