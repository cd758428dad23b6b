use rocket::{
    form::Form,
    http::CookieJar,
    response::{content::RawHtml, Redirect},
    serde::json::Json,
    Route, State,
};

use crate::{
    config::Config,
    error::{Error, Result},
    model::{
        api::{
            auth::AuthToken,
            forms::{LoginForm, RegisterForm},
            reply::ApiReply,
        },
        Store,
    },
    pages,
    service::auth,
};

pub fn routes() -> Vec<Route> {
    routes![login_page, login, logout, logout_anonymous, register]
}

/// Either the login worked, or the form is shown again.
#[derive(Debug, Responder)]
pub enum LoginResponse {
    Success(Redirect),
    Retry(RawHtml<String>),
}

#[get("/login")]
pub fn login_page() -> RawHtml<String> {
    pages::login(None, "")
}

#[post("/login", data = "<form>")]
async fn login(
    form: Option<Form<LoginForm>>,
    cookies: &CookieJar<'_>,
    store: &State<Store>,
    config: &State<Config>,
) -> Result<LoginResponse> {
    let form = form.map(Form::into_inner).unwrap_or_default();
    let email = form.email.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    match auth::login(store, email, password).await {
        Ok(user) => {
            cookies.add(AuthToken::new(&user).into_cookie(config)?);
            Ok(LoginResponse::Success(Redirect::to(uri!(
                super::public::index
            ))))
        }
        Err(Error::Auth) => Ok(LoginResponse::Retry(pages::login(
            Some(&Error::Auth.to_string()),
            email,
        ))),
        Err(e) => Err(e),
    }
}

#[get("/logout")]
fn logout(_token: AuthToken, cookies: &CookieJar<'_>) -> Redirect {
    auth::logout(cookies);
    Redirect::to(uri!(super::public::index))
}

#[get("/logout", rank = 2)]
fn logout_anonymous() -> Redirect {
    Redirect::to(uri!(login_page))
}

#[post("/register", data = "<form>")]
async fn register(
    form: Option<Form<RegisterForm>>,
    store: &State<Store>,
) -> Result<Json<ApiReply>> {
    // Anything that is not a form counts as a form with every field missing.
    let form = form.map(Form::into_inner).unwrap_or_default();
    auth::register(
        store,
        form.email.as_deref().unwrap_or_default(),
        form.name.as_deref().unwrap_or_default(),
        form.password.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(Json(ApiReply::ok()))
}
