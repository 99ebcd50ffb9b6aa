//! Static route table: entity type name -> URL suffix

use super::error::ApiError;

/// Whether a routed type is a server entity or a create payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRole {
    Entity,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub type_name: &'static str,
    pub suffix: &'static str,
    pub role: RouteRole,
}

pub static ROUTES: &[Route] = &[
    // Glossaries
    Route {
        type_name: "Glossary",
        suffix: "/glossaries",
        role: RouteRole::Entity,
    },
    Route {
        type_name: "CreateGlossaryRequest",
        suffix: "/glossaries",
        role: RouteRole::Create,
    },
    // Glossary terms
    Route {
        type_name: "GlossaryTerm",
        suffix: "/glossaryTerms",
        role: RouteRole::Entity,
    },
    Route {
        type_name: "CreateGlossaryTermRequest",
        suffix: "/glossaryTerms",
        role: RouteRole::Create,
    },
];

/// Find the route registered for a type name
pub fn lookup(type_name: &str) -> Result<&'static Route, ApiError> {
    ROUTES
        .iter()
        .find(|route| route.type_name == type_name)
        .ok_or_else(|| ApiError::RouteNotFound {
            type_name: type_name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_routes() {
        assert_eq!(lookup("Glossary").unwrap().suffix, "/glossaries");
        assert_eq!(lookup("GlossaryTerm").unwrap().suffix, "/glossaryTerms");
        assert_eq!(
            lookup("CreateGlossaryTermRequest").unwrap().role,
            RouteRole::Create
        );
    }

    #[test]
    fn test_every_create_route_shares_its_entity_suffix() {
        for route in ROUTES.iter().filter(|r| r.role == RouteRole::Create) {
            let entity_name = route
                .type_name
                .trim_start_matches("Create")
                .trim_end_matches("Request");
            assert_eq!(lookup(entity_name).unwrap().suffix, route.suffix);
        }
    }

    #[test]
    fn test_unknown_route() {
        let err = lookup("Table").unwrap_err();
        assert!(matches!(err, ApiError::RouteNotFound { ref type_name } if type_name == "Table"));
    }
}
