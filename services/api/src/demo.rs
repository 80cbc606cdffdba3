use crate::infra::{demo_campaigns, parse_status, InMemoryFundraisingStore};
use clap::Args;
use fundraise_review::config::ReviewConfig;
use fundraise_review::error::AppError;
use fundraise_review::workflows::fundraising::{
    available_actions, find_action, status_display_info, ChangeOutcome, FundraisingGateway,
    FundraisingId, FundraisingStatus, StatusChangeController, StatusServiceError, TracingNotifier,
};
use fundraise_review::workflows::review::{
    ReviewDraft, ReviewScoringModel, ReviewService, ReviewSummaryGenerator, SectionInput,
    SectionKey,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct StatusActionsArgs {
    /// Current campaign status (open, closed, ready_for_review, archived, hidden, deleted)
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: FundraisingStatus,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewSummaryArgs {
    /// Campaign title used in the summary header
    #[arg(long)]
    pub(crate) title: String,
    /// Basic information score (0 to 0.3)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) basic_info: f64,
    /// Visual content score (0 to 0.2)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) visual_content: f64,
    /// Financial setup score (0 to 0.2)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) financial_setup: f64,
    /// Documentation score (0 to 0.3)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) documentation: f64,
    /// Closing remarks appended to the summary
    #[arg(long)]
    pub(crate) final_comment: Option<String>,
}

pub(crate) fn run_status_actions(args: StatusActionsArgs) -> Result<(), AppError> {
    let display = status_display_info(args.status);
    println!(
        "{} ({}) - {}",
        display.label,
        display.severity.label(),
        display.description
    );

    let actions = available_actions(args.status);
    if actions.is_empty() {
        println!("No owner actions: status is managed by admins");
        return Ok(());
    }

    for action in actions {
        let confirmation = action
            .confirmation_message
            .map(|message| format!(" [confirm: {message}]"))
            .unwrap_or_default();
        println!(
            "- {} -> {}: {}{}",
            action.label,
            action.target_status.label(),
            action.description,
            confirmation
        );
    }
    Ok(())
}

pub(crate) fn run_review_summary(args: ReviewSummaryArgs) -> Result<(), AppError> {
    let mut model = ReviewScoringModel::standard();
    model.update_section(SectionKey::BasicInfo, args.basic_info, "");
    model.update_section(SectionKey::VisualContent, args.visual_content, "");
    model.update_section(SectionKey::FinancialSetup, args.financial_setup, "");
    model.update_section(SectionKey::Documentation, args.documentation, "");
    if let Some(comment) = args.final_comment {
        model.set_final_comment(comment);
    }

    println!(
        "{}",
        ReviewSummaryGenerator::generate(&args.title, &model.snapshot())
    );
    println!("\nOverall: {}", model.overall_rating().label());
    Ok(())
}

pub(crate) async fn run_demo() -> Result<(), AppError> {
    println!("Fundraising lifecycle demo");
    let store = Arc::new(InMemoryFundraisingStore::with_records(demo_campaigns()));
    let notifier = Arc::new(TracingNotifier);
    let id = FundraisingId("field-hospital".to_string());

    let controller = StatusChangeController::new(id.clone(), store.clone(), notifier.clone());
    let record = store
        .get_fundraising(&id)
        .await
        .map_err(StatusServiceError::from)?;
    println!(
        "- {} is {}",
        record.title,
        status_display_info(record.status).label
    );

    if let Some(action) = find_action(record.status, FundraisingStatus::ReadyForReview) {
        if let ChangeOutcome::AwaitingConfirmation { action } =
            controller.request_change(action).await
        {
            println!(
                "  Confirmation: {}",
                action.confirmation_message.unwrap_or_default()
            );
        }
        match controller.confirm().await {
            ChangeOutcome::Applied { target_status } => {
                println!("  Moved to {}", target_status.label());
            }
            other => println!("  Status change did not apply: {other:?}"),
        }
    }

    let reviews = ReviewService::new(
        store.clone(),
        store.clone(),
        notifier,
        &ReviewConfig::default(),
    );
    let queue = reviews.pending(0).await?;
    println!("\nReview queue ({} pending)", queue.total);
    for item in &queue.items {
        println!("- {} ({})", item.title, item.fundraising_id);
    }

    let draft = ReviewDraft {
        sections: vec![
            SectionInput {
                key: SectionKey::BasicInfo,
                score: Some(0.27),
                stars: None,
                comment: "Clear purpose and story".to_string(),
            },
            SectionInput {
                key: SectionKey::VisualContent,
                score: None,
                stars: Some(4),
                comment: String::new(),
            },
            SectionInput {
                key: SectionKey::FinancialSetup,
                score: Some(0.2),
                stars: None,
                comment: String::new(),
            },
            SectionInput {
                key: SectionKey::Documentation,
                score: Some(0.21),
                stars: None,
                comment: "Add the final delivery report".to_string(),
            },
        ],
        final_comment: "Good to archive once the last report is attached".to_string(),
    };
    let request = reviews.submit(&id, &draft).await?;
    println!("\n{}", request.summary);
    println!("\nStored reviews: {}", store.reviews().len());
    Ok(())
}
