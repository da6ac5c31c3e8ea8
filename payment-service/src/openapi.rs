//! OpenAPI documents generated from the route table.
//!
//! One full document plus one per group; a group keeps the routes whose path
//! starts with its prefix.

use std::collections::BTreeMap;

use utoipa::openapi::{
    external_docs::ExternalDocsBuilder,
    path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItem},
    request_body::RequestBodyBuilder,
    tag::TagBuilder,
    InfoBuilder, LicenseBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Required, Response,
};

use crate::config::ServiceConfiguration;
use crate::routes::{Route, TAG_CONFIG, TAG_HEALTH, TAG_PAYMENT, TAG_SERVICE};

pub const API_VERSION: &str = "v0.1.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiGroup {
    pub name: String,
    pub prefix: String,
}

impl ApiGroup {
    fn matches(&self, route: &Route) -> bool {
        route.path.starts_with(&self.prefix)
    }
}

/// The groups published under `{api_doc_path}/{group}`.
pub fn api_groups(config: &ServiceConfiguration) -> Vec<ApiGroup> {
    let name = config.service_name();
    vec![
        ApiGroup {
            name: format!("{name}-service"),
            prefix: "/api/".to_string(),
        },
        ApiGroup {
            name: format!("{name}-service-{}", name.to_lowercase()),
            prefix: format!("{}/", config.service_api_path()),
        },
        ApiGroup {
            name: format!("{name}-service-core"),
            prefix: format!("{}/", config.health_path()),
        },
    ]
}

#[derive(Clone)]
pub struct ApiDocs {
    full: OpenApi,
    groups: BTreeMap<String, OpenApi>,
}

impl ApiDocs {
    pub fn from_routes(config: &ServiceConfiguration, routes: &[Route]) -> Self {
        let full = document(config, routes.iter());
        let groups = api_groups(config)
            .into_iter()
            .map(|group| {
                let doc = document(config, routes.iter().filter(|route| group.matches(route)));
                (group.name, doc)
            })
            .collect();

        Self { full, groups }
    }

    pub fn full(&self) -> &OpenApi {
        &self.full
    }

    pub fn group(&self, name: &str) -> Option<&OpenApi> {
        self.groups.get(name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

fn document<'a>(config: &ServiceConfiguration, routes: impl Iterator<Item = &'a Route>) -> OpenApi {
    let name = config.service_name();

    let paths = routes.fold(PathsBuilder::new(), |paths, route| {
        paths.path(route.openapi_path(), PathItem::new(route.method.clone(), operation(route)))
    });

    let info = InfoBuilder::new()
        .title(format!("{name} Microservice"))
        .description(Some(format!("{name} Microservices")))
        .version(API_VERSION)
        .license(Some(
            LicenseBuilder::new()
                .name("Apache 2.0")
                .url(Some("https://www.apache.org/licenses/LICENSE-2.0"))
                .build(),
        ))
        .build();

    let tags = [
        (TAG_SERVICE, "Service banner"),
        (TAG_HEALTH, "Health (Liveness, Readiness, ReStart.. etc)"),
        (TAG_CONFIG, "Config (Environment, ConfigMap.. etc)"),
        (TAG_PAYMENT, "Payment Service"),
    ]
    .into_iter()
    .map(|(tag, description)| TagBuilder::new().name(tag).description(Some(description)).build())
    .collect::<Vec<_>>();

    OpenApiBuilder::new()
        .info(info)
        .paths(paths)
        .tags(Some(tags))
        .external_docs(Some(
            ExternalDocsBuilder::new()
                .url(format!("{}/service/home", config.service_api_path()))
                .description(Some(format!("{name} Service Home")))
                .build(),
        ))
        .build()
}

fn operation(route: &Route) -> utoipa::openapi::path::Operation {
    let mut builder = OperationBuilder::new()
        .summary(Some(route.summary))
        .tag(route.tag);

    for param in route.path_params() {
        builder = builder.parameter(
            ParameterBuilder::new()
                .name(param)
                .parameter_in(ParameterIn::Path)
                .required(Required::True)
                .build(),
        );
    }

    if let Some(description) = route.request_body {
        builder = builder.request_body(Some(
            RequestBodyBuilder::new()
                .description(Some(description))
                .required(Some(Required::True))
                .build(),
        ));
    }

    for (code, description) in &route.responses {
        builder = builder.response(*code, Response::new(*description));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::route_table;
    use service_core::config::ConfigSource;

    fn payment_config() -> ServiceConfiguration {
        ServiceConfiguration::from_source(
            &ConfigSource::new("payment-service-missing-config", "PAYTEST_DOCS")
                .with_override("service_name", "Payment"),
        )
        .unwrap()
    }

    #[test]
    fn full_document_covers_every_route() {
        let config = payment_config();
        let routes = route_table(&config);
        let docs = ApiDocs::from_routes(&config, &routes);

        assert_eq!(docs.full().paths.paths.len(), routes.len());
        assert!(docs
            .full()
            .paths
            .paths
            .contains_key("/api/v1/payment/status/{referenceNo}"));
        assert_eq!(docs.full().info.title, "Payment Microservice");
    }

    #[test]
    fn groups_filter_by_prefix() {
        let config = payment_config();
        let routes = route_table(&config);
        let docs = ApiDocs::from_routes(&config, &routes);

        let names: Vec<_> = docs.group_names().collect();
        assert_eq!(
            names,
            vec!["Payment-service", "Payment-service-core", "Payment-service-payment"]
        );

        let core = docs.group("Payment-service-core").unwrap();
        assert!(core.paths.paths.keys().all(|p| p.starts_with("/api/v1/payment/service/")));
        assert_eq!(core.paths.paths.len(), 5);

        let all_api = docs.group("Payment-service").unwrap();
        assert!(!all_api.paths.paths.contains_key("/"));
        assert_eq!(all_api.paths.paths.len(), routes.len() - 1);
    }
}
