use std::{collections::HashMap, env, path::PathBuf, sync::Arc};

use anyhow::Context;
use clinical_views::{
    history::{diagnoses::project_diagnoses, vitals::project_vitals},
    prescriptions::{
        cqrs, Command, EntryPanel, EntrySurface, FormState, ModeToggle, PanelData, PanelLayout,
        PrescriptionMutator, Services, View,
    },
    DisplaySettings, EventLog,
};
use ulid::Ulid;

mod fixture;
mod page;

use fixture::{Fixture, Interaction};
use page::{ConsultationPage, PageState};

const FIXTURE_VAR: &str = "PANEL_PREVIEW_FIXTURE";

struct Preview {
    framework: Arc<cqrs::PanelFramework>,
    repo: cqrs::PanelRepository,
    panel_id: String,
}

impl Preview {
    async fn execute(&self, command: Command) -> anyhow::Result<()> {
        let mut metadata = HashMap::new();
        metadata.insert("command_id".to_string(), Ulid::new().to_string());

        self.framework
            .execute_with_metadata(&self.panel_id, command, metadata)
            .await?;
        Ok(())
    }

    async fn view(&self) -> anyhow::Result<View> {
        self.repo
            .load(&self.panel_id)
            .await?
            .with_context(|| format!("panel {} not opened", self.panel_id))
    }

    async fn panel(&self) -> anyhow::Result<EntryPanel> {
        Ok(self.view().await?.panel)
    }
}

fn render<'a>(
    panel: &'a EntryPanel,
    state: &'a PageState,
    fixture: &'a Fixture,
    page: &'a ConsultationPage,
) -> PanelLayout<'a> {
    let form = FormState::new(&state.draft, state.editing.as_ref(), state.processing);
    let data = PanelData::new(page.drugs(), &state.prescriptions, form)
        .with_previous(&fixture.previous_prescriptions);
    panel.render(data, page)
}

/// Edit actions live on the single form; batch mode has nothing to route them to.
fn in_single_mode(layout: &PanelLayout<'_>, action: &str) -> bool {
    let single = matches!(layout.entry, EntrySurface::Single(_));
    if !single {
        tracing::warn!("{} is only available in single entry mode", action);
    }
    single
}

async fn interact(
    preview: &Preview,
    page: &ConsultationPage,
    fixture: &Fixture,
    interaction: &Interaction,
) -> anyhow::Result<()> {
    let panel = preview.panel().await?;
    let state = page.snapshot();
    let layout = render(&panel, &state, fixture, page);
    let mutator: &dyn PrescriptionMutator = layout.entry.shared().mutator;

    match interaction {
        Interaction::ToggleMode => {
            let Some(command) = layout.toggle().map(ModeToggle::toggle) else {
                tracing::warn!("Mode toggle not rendered for a read-only panel");
                return Ok(());
            };
            preview.execute(command).await?;
        }
        Interaction::SetStatus { status } => {
            let context = fixture.panel.context_with_status(Some(status.clone()));
            preview.execute(Command::ChangeContext { context }).await?;
        }
        Interaction::SetField { field, value } => mutator.set_field(*field, value.clone()),
        Interaction::Submit => mutator.submit(),
        Interaction::Delete { prescription_id } => mutator.delete(*prescription_id),
        Interaction::Edit { prescription_id } => {
            if !in_single_mode(&layout, "edit") {
                return Ok(());
            }
            match state
                .prescriptions
                .iter()
                .find(|prescription| prescription.id == *prescription_id)
            {
                Some(prescription) => mutator.edit(prescription),
                None => tracing::warn!("Prescription #{} not found", prescription_id),
            }
        }
        Interaction::Update => {
            if in_single_mode(&layout, "update") {
                mutator.update();
            }
        }
        Interaction::CancelEdit => {
            if in_single_mode(&layout, "cancel_edit") {
                mutator.cancel_edit();
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let path = env::var(FIXTURE_VAR).map(PathBuf::from).unwrap_or_else(|_| {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/consultation.json"))
    });
    let settings = DisplaySettings::from_env()?;
    let fixture = fixture::load(&path)?;

    let page = Arc::new(ConsultationPage::new(
        fixture.drugs.clone(),
        fixture.prescriptions.clone(),
    ));
    let log = EventLog::default();
    let repo = cqrs::init_repo();
    let framework = cqrs::init(repo.clone(), Services::new(page.clone()), log.clone());

    let preview = Preview {
        framework,
        repo,
        panel_id: fixture.panel.panel_id(),
    };
    preview
        .execute(Command::OpenPanel {
            id: preview.panel_id.clone(),
            context: fixture.panel.context(),
        })
        .await?;

    for interaction in &fixture.script {
        tracing::info!("{:?}", interaction);
        interact(&preview, &page, &fixture, interaction).await?;
    }

    let view = preview.view().await?;
    tracing::info!(
        "Panel {} in {} mode after {} switch(es), abandoned edits {:?}",
        view.id,
        view.panel.mode.label(),
        view.mode_switches,
        view.abandoned_edits
    );

    let state = page.snapshot();
    let layout = render(&view.panel, &state, &fixture, &page);
    println!("{}", serde_json::to_string_pretty(&layout)?);

    println!("\nDiagnoses\n{}", project_diagnoses(&fixture.diagnoses, &settings).to_text());
    println!("\nVital signs\n{}", project_vitals(&fixture.vitals, &settings).to_text());

    if !fixture.previous_prescriptions.is_empty() {
        println!("\nPrevious prescriptions");
        for previous in &fixture.previous_prescriptions {
            println!(
                "{} | {} | {} | {}",
                settings.format_timestamp(&previous.consultation.started_at),
                previous.medication_name,
                previous.prescriber(),
                previous.department()
            );
        }
    }

    for event in log.entries() {
        tracing::info!("{} #{} {}", event.event_type, event.sequence, event.payload);
    }

    Ok(())
}
