//! Ownership-scoped access to companies, agents and their conversations.
//!
//! Access is transitive down User → Company → Agent → Thread → Message. Every
//! lookup that fails the ownership check returns `NotFoundOrDenied`, the same
//! error a missing record produces, so callers cannot discover ids they do
//! not own.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use switchboard_types::{
    Agent, AgentUpdate, Company, CompanyUpdate, Message, NewAgent, Thread,
};

use crate::error::{PersistError, Result};
use crate::repositories::{
    AgentRepository, CompanyRepository, MessageRepository, ThreadRepository,
};

/// A parent failing the ownership check reports the child as missing.
fn as_missing(entity: &'static str) -> impl FnOnce(PersistError) -> PersistError {
    move |err| match err {
        PersistError::NotFoundOrDenied { .. } => PersistError::not_found(entity),
        other => other,
    }
}

#[derive(Clone)]
pub struct OwnershipResolver {
    companies: Arc<dyn CompanyRepository>,
    agents: Arc<dyn AgentRepository>,
    threads: Arc<dyn ThreadRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl OwnershipResolver {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        agents: Arc<dyn AgentRepository>,
        threads: Arc<dyn ThreadRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            companies,
            agents,
            threads,
            messages,
        }
    }

    pub async fn company(&self, owner_id: &str, company_id: &str) -> Result<Company> {
        match self.companies.find_by_id(company_id).await? {
            Some(company) if company.owner_id == owner_id => Ok(company),
            _ => Err(PersistError::not_found("Company")),
        }
    }

    pub async fn companies(&self, owner_id: &str) -> Result<Vec<Company>> {
        self.companies.list_by_owner(owner_id).await
    }

    pub async fn update_company(
        &self,
        owner_id: &str,
        company_id: &str,
        update: CompanyUpdate,
        at: DateTime<Utc>,
    ) -> Result<Company> {
        let company = self.company(owner_id, company_id).await?;
        if update.is_empty() {
            return Ok(company);
        }
        self.companies
            .update(&company.id, update, at)
            .await?
            .ok_or_else(|| PersistError::not_found("Company"))
    }

    /// Deletes the company and, through `delete_agent`, everything below it.
    pub async fn delete_company(&self, owner_id: &str, company_id: &str) -> Result<Company> {
        let company = self.company(owner_id, company_id).await?;
        let agents = self.agents.list_by_companies(&[company.id.clone()]).await?;
        for agent in &agents {
            self.remove_agent_tree(agent).await?;
        }
        self.companies.delete(&company.id).await?;
        tracing::info!(
            company_id = %company.id,
            agents = agents.len(),
            "company deleted"
        );
        Ok(company)
    }

    /// The agent together with the company that makes the caller its owner.
    pub async fn agent(&self, owner_id: &str, agent_id: &str) -> Result<(Agent, Company)> {
        let agent = self
            .agents
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| PersistError::not_found("Agent"))?;
        let company = self
            .company(owner_id, &agent.company_id)
            .await
            .map_err(as_missing("Agent"))?;
        Ok((agent, company))
    }

    /// All agents across the caller's companies, or those of one owned company.
    pub async fn agents(&self, owner_id: &str, company_id: Option<&str>) -> Result<Vec<Agent>> {
        let company_ids = match company_id {
            Some(company_id) => vec![self.company(owner_id, company_id).await?.id],
            None => self
                .companies
                .list_by_owner(owner_id)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect(),
        };
        self.agents.list_by_companies(&company_ids).await
    }

    pub async fn create_agent(&self, owner_id: &str, agent: NewAgent) -> Result<Agent> {
        self.company(owner_id, &agent.company_id).await?;
        self.agents.create(agent).await
    }

    /// Moving an agent requires owning the destination company as well; that
    /// is checked before anything is written.
    pub async fn update_agent(
        &self,
        owner_id: &str,
        agent_id: &str,
        update: AgentUpdate,
        at: DateTime<Utc>,
    ) -> Result<Agent> {
        let (agent, _) = self.agent(owner_id, agent_id).await?;
        if let Some(company_id) = &update.company_id {
            if *company_id != agent.company_id {
                self.company(owner_id, company_id).await?;
            }
        }
        self.agents
            .update(&agent.id, update, at)
            .await?
            .ok_or_else(|| PersistError::not_found("Agent"))
    }

    pub async fn delete_agent(&self, owner_id: &str, agent_id: &str) -> Result<Agent> {
        let (agent, _) = self.agent(owner_id, agent_id).await?;
        self.remove_agent_tree(&agent).await?;
        Ok(agent)
    }

    pub async fn threads(&self, owner_id: &str, agent_id: &str) -> Result<Vec<Thread>> {
        let (agent, _) = self.agent(owner_id, agent_id).await?;
        self.threads.list_by_agent(&agent.id).await
    }

    pub async fn thread(&self, owner_id: &str, thread_id: &str) -> Result<(Thread, Agent)> {
        let thread = self
            .threads
            .find_by_id(thread_id)
            .await?
            .ok_or_else(|| PersistError::not_found("Thread"))?;
        let (agent, _) = self
            .agent(owner_id, &thread.agent_id)
            .await
            .map_err(as_missing("Thread"))?;
        Ok((thread, agent))
    }

    pub async fn messages(&self, owner_id: &str, thread_id: &str) -> Result<Vec<Message>> {
        let (thread, _) = self.thread(owner_id, thread_id).await?;
        self.messages.list_by_thread(&thread.id).await
    }

    /// Children first, so a failure part way leaves no dangling references.
    async fn remove_agent_tree(&self, agent: &Agent) -> Result<()> {
        let thread_ids: Vec<String> = self
            .threads
            .list_by_agent(&agent.id)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let removed_messages = self.messages.delete_by_threads(&thread_ids).await?;
        self.threads.delete_by_agent(&agent.id).await?;
        self.agents.delete(&agent.id).await?;
        tracing::info!(
            agent_id = %agent.id,
            threads = thread_ids.len(),
            messages = removed_messages,
            "agent deleted"
        );
        Ok(())
    }
}
