use std::sync::Arc;

use clap::Args;
use cleanhub::config::AppConfig;
use cleanhub::error::AppError;
use cleanhub::workflows::decline::{
    decline_router, DeclineAction, DeclineResolver, DeclineResponseService, HomeAttributeField,
    MarketplaceClient, ResolutionStep, ServiceAreaPricingEngine,
};
use reqwest::Url;

use crate::infra::{
    seed_demo_data, InMemoryAppointmentRepository, InMemoryHomeRepository,
    InMemoryNotificationPublisher,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed the demo home with complete attributes so pricing happens immediately
    #[arg(long)]
    pub(crate) complete_home: bool,
    /// Cancel the declined appointment instead of re-listing it
    #[arg(long)]
    pub(crate) cancel: bool,
}

/// End-to-end walkthrough: an in-process server, a real HTTP client, and
/// the resolution flow a homeowner would drive from the modal.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let appointments = Arc::new(InMemoryAppointmentRepository::default());
    let homes = Arc::new(InMemoryHomeRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let appointment_id = seed_demo_data(&appointments, &homes, args.complete_home);
    let service = Arc::new(DeclineResponseService::new(
        appointments.clone(),
        homes,
        notifications,
        ServiceAreaPricingEngine::new(config.pricing),
    ));

    let app = decline_router(service.clone());
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            eprintln!("demo server stopped: {err}");
        }
    });

    println!("Cleanhub decline-resolution demo");
    let notification =
        service.record_decline(appointment_id, Some("Crew double-booked".to_string()))?;
    println!(
        "- {} declined the {} appointment: {}",
        notification
            .business_owner_name
            .as_deref()
            .unwrap_or("The business owner"),
        notification.appointment_date,
        notification.reason.as_deref().unwrap_or("no reason given")
    );

    let base_url = Url::parse(&format!("http://{addr}/")).expect("loopback url");
    let api = MarketplaceClient::new(base_url);
    let mut resolver = DeclineResolver::open(api, notification);

    if args.cancel {
        resolver.choose(DeclineAction::Cancel).await?;
        if let Some(appointment) = appointments.get(appointment_id) {
            println!("- Appointment cancelled (status {})", appointment.status.label());
        }
        return Ok(());
    }

    resolver.choose(DeclineAction::Marketplace).await?;

    let missing = match resolver.step() {
        ResolutionStep::HomeDetails { missing_fields, .. } => missing_fields.clone(),
        _ => Vec::new(),
    };
    if !missing.is_empty() {
        println!("- Marketplace needs home details first:");
        for field in missing {
            let value = demo_value(field);
            resolver.enter_detail(field, value)?;
            println!("  - {field} = {value}");
        }
        resolver.submit_home_details().await?;
    }

    if let ResolutionStep::PriceConfirm {
        marketplace_price,
        current_price,
        ..
    } = resolver.step()
    {
        if marketplace_price == current_price {
            println!("- Marketplace price: ${marketplace_price}");
        } else {
            println!("- Marketplace price: ${marketplace_price} (was ${current_price})");
        }
    }

    resolver.confirm_price().await?;
    resolver.finish()?;

    if let Some(appointment) = appointments.get(appointment_id) {
        println!(
            "- Appointment listed on the marketplace (status {}, price ${})",
            appointment.status.label(),
            appointment
                .marketplace_price
                .unwrap_or(appointment.booked_price)
        );
    }

    Ok(())
}

fn demo_value(field: HomeAttributeField) -> &'static str {
    match field {
        HomeAttributeField::NumBeds => "3",
        HomeAttributeField::NumBaths => "2",
        HomeAttributeField::TimeToBeCompleted => "4",
    }
}
