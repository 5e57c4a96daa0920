use super::utils::{parse_json_object, print_json};
use crate::RulesAction;
use anyhow::Result;
use ragc_interaction::RagServiceClient;

pub async fn run(client: &RagServiceClient, action: RulesAction) -> Result<()> {
    let rules = client.intent_rules().await;
    let response = match action {
        RulesAction::List => rules.list_rules().await?,
        RulesAction::Create { rule } => {
            let rule = parse_json_object("rule", &rule)?;
            rules.create_rule(&rule).await?
        }
        RulesAction::Update { id, rule } => {
            let rule = parse_json_object("rule", &rule)?;
            rules.update_rule(&id, &rule).await?
        }
        RulesAction::Delete { id } => rules.delete_rule(&id).await?,
        RulesAction::Refresh => rules.refresh_rules().await?,
    };
    print_json(&response)
}
