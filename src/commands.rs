use teloxide::macros::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "Open the main menu")]
    Start,
    #[command(description = "Check your coin balance")]
    Balance,
    #[command(description = "Buy coin packages")]
    Shop,
    #[command(description = "List your subscriptions")]
    Subscriptions,
    #[command(description = "Show help message")]
    Help,
}
