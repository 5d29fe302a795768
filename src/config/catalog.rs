//! Built-in catalog for the ride-hailing backend: users, rides, chat, driver documents and status history.

use crate::config::types::{Catalog, CollectionSpec, FieldDefinition as F, RuleSlot};

const ADMIN: &str = r#"@request.auth.role = "Admin""#;

/// Catalog used when no catalog file is given.
pub fn builtin_catalog() -> Catalog {
    Catalog::new(vec![users(), rides(), messages(), driver_documents(), driver_status_logs()])
}

fn users() -> CollectionSpec {
    CollectionSpec::auth("users")
        .field(F::text("name").required())
        .field(F::file("avatar").max_size(1_048_576))
        .field(F::text("phone"))
        .field(F::select("role", &["Passageiro", "Motorista", "Admin", "Atendente"]).required())
        .field(F::select(
            "driver_status",
            &["Online", "Offline", "Em Viagem (Urbano)", "Em Viagem (Rural)"],
        ))
        .field(F::text("driver_vehicle_model"))
        .field(F::text("driver_vehicle_plate"))
        .field(F::file("driver_vehicle_photo"))
        .field(F::text("driver_pix_key"))
        .field(F::select("driver_fare_type", &["fixed", "km"]))
        .field(F::number("driver_fixed_rate"))
        .field(F::number("driver_km_rate"))
        .field(F::boolean("driver_accepts_rural"))
        .rule(RuleSlot::List, r#"@request.auth.id != """#)
        .rule(
            RuleSlot::View,
            r#"@request.auth.id = id || @request.auth.role = "Admin" || @request.auth.role = "Atendente" || @request.auth.role = "Motorista""#,
        )
        .rule(RuleSlot::Create, "")
        .rule(RuleSlot::Update, r#"@request.auth.id = id || @request.auth.role = "Admin""#)
        .rule(RuleSlot::Delete, ADMIN)
}

fn rides() -> CollectionSpec {
    CollectionSpec::base("rides")
        .field(F::relation("passenger", "users").required())
        .field(F::relation("driver", "users"))
        .field(F::text("origin_address").required())
        .field(F::text("destination_address").required())
        .field(
            F::select("status", &["requested", "accepted", "in_progress", "completed", "canceled"]).required(),
        )
        .field(F::number("fare").required())
        .field(F::boolean("is_negotiated").required())
        .field(F::select("started_by", &["passenger", "driver"]).required())
        .rule(
            RuleSlot::List,
            r#"(@request.auth.id ?= passenger || @request.auth.id ?= driver || @request.auth.role = "Atendente") || @request.auth.role = "Admin""#,
        )
        .rule(
            RuleSlot::View,
            r#"(@request.auth.id ?= passenger || @request.auth.id ?= driver) || @request.auth.role = "Admin""#,
        )
        .rule(
            RuleSlot::Create,
            r#"@request.auth.role = "Passageiro" || @request.auth.role = "Admin""#,
        )
        .rule(
            RuleSlot::Update,
            r#"@request.auth.id ?= driver || @request.auth.id ?= passenger || @request.auth.role = "Admin""#,
        )
        .rule(RuleSlot::Delete, ADMIN)
}

fn messages() -> CollectionSpec {
    CollectionSpec::base("messages")
        .field(F::relation("ride", "rides").required())
        .field(F::relation("sender", "users").required())
        .field(F::text("text").required())
        .rule(
            RuleSlot::List,
            r#"(@request.auth.id ?= ride.passenger || @request.auth.id ?= ride.driver || @request.auth.role = "Atendente") || @request.auth.role = "Admin""#,
        )
        .rule(
            RuleSlot::View,
            r#"(@request.auth.id ?= ride.passenger || @request.auth.id ?= ride.driver) || @request.auth.role = "Admin""#,
        )
        .rule(
            RuleSlot::Create,
            "@request.auth.id ?= ride.passenger || @request.auth.id ?= ride.driver",
        )
        .rule(RuleSlot::Update, ADMIN)
        .rule(RuleSlot::Delete, ADMIN)
}

fn driver_documents() -> CollectionSpec {
    let owner_or_admin = r#"@request.auth.id ?= driver || @request.auth.role = "Admin""#;
    CollectionSpec::base("driver_documents")
        .field(F::relation("driver", "users").required())
        .field(F::select("document_type", &["CNH", "CRLV"]).required())
        .field(F::file("file").required())
        .field(F::boolean("is_verified"))
        .rule(RuleSlot::List, owner_or_admin)
        .rule(RuleSlot::View, owner_or_admin)
        .rule(RuleSlot::Create, "@request.auth.id ?= driver")
        .rule(RuleSlot::Update, owner_or_admin)
        .rule(RuleSlot::Delete, ADMIN)
}

fn driver_status_logs() -> CollectionSpec {
    CollectionSpec::base("driver_status_logs")
        .field(F::relation("driver", "users").required())
        .field(F::text("status").required())
        .rule(RuleSlot::List, ADMIN)
        .rule(RuleSlot::View, ADMIN)
        .rule(RuleSlot::Create, ADMIN)
        .rule(RuleSlot::Update, "false")
        .rule(RuleSlot::Delete, "false")
}
