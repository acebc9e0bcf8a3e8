use leptos::prelude::*;

use crate::layout::notice_bar::NoticeBar;
use crate::routes::navigator::Navigation;
use crate::routes::table::RouteDef;
use crate::system::auth::context::use_shell;
use crate::system::pages::entity_list::{EntityListPage, ListKind};
use crate::system::pages::home::HomePage;
use crate::system::pages::login::LoginPage;
use crate::system::pages::record_detail::{DetailKind, RecordDetailPage};
use crate::system::pages::register::RegisterPage;

/// Page tree of the console. Everything under `/` needs a session.
pub fn app_routes() -> Vec<RouteDef> {
    vec![
        RouteDef::new("/login", "Login"),
        RouteDef::new("/register", "Register"),
        RouteDef::new("/", "Home").requires_auth().children(vec![
            RouteDef::new("organizations", "Organizations"),
            RouteDef::new("organizations/:id", "OrganizationDetail"),
            RouteDef::new("projects", "Projects"),
            RouteDef::new("products", "Products"),
            RouteDef::new("users", "Users"),
            RouteDef::new("roles", "Roles"),
            RouteDef::new("logs", "Logs"),
            RouteDef::new("object-classes", "ObjectClasses"),
            RouteDef::new("object-classes/:id", "ObjectClassDetail"),
        ]),
        // first-generation console linked here after login
        RouteDef::new("/dashboard", "Dashboard").redirect("/"),
    ]
}

fn render_page(navigation: Navigation) -> AnyView {
    let id = navigation
        .params
        .iter()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();

    match navigation.route_name.as_str() {
        "Login" => view! { <LoginPage /> }.into_any(),
        "Register" => view! { <RegisterPage /> }.into_any(),
        "Home" => view! { <HomePage /> }.into_any(),
        "OrganizationDetail" => {
            view! { <RecordDetailPage kind=DetailKind::Organization id=id /> }.into_any()
        }
        "ObjectClassDetail" => {
            view! { <RecordDetailPage kind=DetailKind::ObjectClass id=id /> }.into_any()
        }
        name => match ListKind::from_route(name) {
            Some(kind) => view! { <EntityListPage kind=kind /> }.into_any(),
            None => view! { <div class="not-found">"Page not found."</div> }.into_any(),
        },
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let shell = use_shell();

    view! {
        <NoticeBar />
        {move || match shell.route.get() {
            Some(navigation) => render_page(navigation),
            None => view! { <div class="not-found">"Page not found."</div> }.into_any(),
        }}
    }
}
