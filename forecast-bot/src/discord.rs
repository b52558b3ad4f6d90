use anyhow::Context as _;
use forecast_core::{ATTACHMENT_NAME, ForecastError, ForecastReply, ForecastService, Locale};
use serenity::{
    all::{
        Client, Command, CommandInteraction, CommandOptionType, Context, CreateAttachment,
        CreateCommand, CreateCommandOption, CreateInteractionResponse,
        CreateInteractionResponseFollowup, CreateInteractionResponseMessage, EventHandler,
        GatewayIntents, Interaction, Ready, ResolvedValue,
    },
    async_trait,
};
use tracing::{error, info, warn};

pub const COMMAND_NAME: &str = "forecast";
const CITY_OPTION: &str = "city";

/// Gateway event handler serving the `/forecast` slash command.
pub struct Handler {
    service: ForecastService,
}

impl Handler {
    pub fn new(service: ForecastService) -> Self {
        Self { service }
    }

    async fn forecast(&self, ctx: &Context, command: &CommandInteraction) {
        let locale = self.service.locale();

        // Discord marks the interaction failed unless it is answered within
        // three seconds, so acknowledge before doing any network work.
        let ack = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(locale.texts().acknowledgment)
                .ephemeral(true),
        );
        if let Err(e) = command.create_response(&ctx.http, ack).await {
            error!(error = %e, "failed to acknowledge /forecast");
            return;
        }

        let followup = match city_option(command) {
            Some(city) => {
                info!(%city, user = %command.user.name, "forecast requested");
                let outcome = self.service.forecast(&city).await;
                if let Err(err) = &outcome {
                    error!(%city, error = %err, "forecast failed");
                }
                followup_for(outcome, locale)
            }
            None => {
                warn!(user = %command.user.name, "forecast requested without a city");
                CreateInteractionResponseFollowup::new().content(locale.texts().generic_failure)
            }
        };

        if let Err(e) = command.create_followup(&ctx.http, followup).await {
            error!(error = %e, "failed to send forecast follow-up");
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "bot is logged in");

        match Command::create_global_command(&ctx.http, register(self.service.locale())).await {
            Ok(command) => info!(command = %command.name, "slash command registered"),
            Err(e) => error!(error = %e, "failed to register slash command"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if command.data.name == COMMAND_NAME {
            self.forecast(&ctx, &command).await;
        } else {
            warn!(command = %command.data.name, "ignoring unknown command");
        }
    }
}

/// Definition of `/forecast city:<name>`.
pub fn register(locale: Locale) -> CreateCommand {
    let texts = locale.texts();
    CreateCommand::new(COMMAND_NAME).description(texts.command_description).add_option(
        CreateCommandOption::new(CommandOptionType::String, CITY_OPTION, texts.city_option_description)
            .required(true),
    )
}

fn city_option(command: &CommandInteraction) -> Option<String> {
    command.data.options().into_iter().find_map(|option| match (option.name, option.value) {
        (CITY_OPTION, ResolvedValue::String(city)) if !city.trim().is_empty() => {
            Some(city.trim().to_string())
        }
        _ => None,
    })
}

/// Follow-up message: text plus chart on success, a plain message otherwise.
fn followup_for(
    outcome: Result<ForecastReply, ForecastError>,
    locale: Locale,
) -> CreateInteractionResponseFollowup {
    match outcome {
        Ok(reply) => CreateInteractionResponseFollowup::new()
            .content(reply.text)
            .add_file(CreateAttachment::bytes(reply.png, ATTACHMENT_NAME)),
        Err(err) => CreateInteractionResponseFollowup::new().content(err.user_message(locale)),
    }
}

/// Connect to the gateway and serve commands until the connection ends.
pub async fn run(token: &str, service: ForecastService) -> anyhow::Result<()> {
    let mut client = Client::builder(token, GatewayIntents::empty())
        .event_handler(Handler::new(service))
        .await
        .context("Failed to create Discord client")?;

    client.start().await.context("Discord client stopped with an error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::{AggregateError, ProviderError};

    #[test]
    fn command_has_one_required_city_option() {
        let json = serde_json::to_value(register(Locale::En)).unwrap();

        assert_eq!(json["name"], "forecast");
        assert_eq!(json["description"], "Get the daily weather forecast for the next 5 days");

        let options = json["options"].as_array().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0]["name"], "city");
        assert_eq!(options[0]["required"], true);
    }

    #[test]
    fn provider_failure_followup_says_city_not_found() {
        let err = ForecastError::from(ProviderError::Status { status: 404, body: String::new() });
        let json = serde_json::to_value(followup_for(Err(err), Locale::De)).unwrap();

        assert_eq!(json["content"], "Stadt nicht gefunden oder Fehler bei der Abfrage der Wetterdaten.");
    }

    #[test]
    fn other_failures_followup_is_generic() {
        let err = ForecastError::from(AggregateError::EmptyInput);
        let json = serde_json::to_value(followup_for(Err(err), Locale::En)).unwrap();

        assert_eq!(json["content"], "An error occurred. Please try again later.");
    }

    #[test]
    fn success_followup_carries_text() {
        let reply = ForecastReply { text: "Weather forecast for Berlin:\n".into(), png: vec![1, 2, 3] };
        let json = serde_json::to_value(followup_for(Ok(reply), Locale::En)).unwrap();

        assert_eq!(json["content"], "Weather forecast for Berlin:\n");
    }
}
