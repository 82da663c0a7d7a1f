use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use switchboard_types::ids::new_id;
use switchboard_types::{
    Agent, AgentUpdate, Company, CompanyUpdate, Contact, Message, NewAgent, NewCompany,
    NewContact, NewMessage, NewThread, NewUser, Origin, Thread, UserCredentials, UserProfile,
};

use crate::error::{PersistError, Result};
use crate::repositories::{
    AgentRepository, CompanyRepository, ContactRepository, MessageRepository, ThreadRepository,
    UserRepository,
};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, UserCredentials>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<UserProfile> {
        let email = NewUser::normalize_email(&user.email);
        let mut users = self.users.write().await;
        if users.values().any(|u| u.profile.email == email) {
            return Err(PersistError::Conflict("Email already registered".to_string()));
        }

        let profile = UserProfile {
            id: new_id(),
            name: user.name,
            email,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        users.insert(
            profile.id.clone(),
            UserCredentials {
                profile: profile.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(profile)
    }

    async fn find_by_email_with_secret(&self, email: &str) -> Result<Option<UserCredentials>> {
        let email = NewUser::normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.profile.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>> {
        let users = self.users.read().await;
        Ok(users.get(id).map(|u| u.profile.clone()))
    }
}

#[derive(Default)]
pub struct MemoryCompanyRepository {
    companies: RwLock<HashMap<String, Company>>,
}

fn company_name_taken(
    companies: &HashMap<String, Company>,
    owner_id: &str,
    name: &str,
    except: Option<&str>,
) -> bool {
    companies.values().any(|c| {
        c.owner_id == owner_id && c.name == name && Some(c.id.as_str()) != except
    })
}

#[async_trait]
impl CompanyRepository for MemoryCompanyRepository {
    async fn create(&self, company: NewCompany) -> Result<Company> {
        let mut companies = self.companies.write().await;
        if company_name_taken(&companies, &company.owner_id, &company.name, None) {
            return Err(PersistError::Conflict(format!(
                "Company '{}' already exists",
                company.name
            )));
        }

        let company = Company {
            id: new_id(),
            name: company.name,
            brand_logo_url: company.brand_logo_url,
            brand_color: company.brand_color,
            notifications: company.notifications,
            owner_id: company.owner_id,
            created_at: company.created_at,
            updated_at: company.created_at,
        };
        companies.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.companies.read().await.get(id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Company>> {
        let companies = self.companies.read().await;
        let mut owned: Vec<Company> = companies
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(
        &self,
        id: &str,
        update: CompanyUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Company>> {
        let mut companies = self.companies.write().await;
        let owner_id = match companies.get(id) {
            Some(company) => company.owner_id.clone(),
            None => return Ok(None),
        };
        if let Some(name) = &update.name {
            if company_name_taken(&companies, &owner_id, name, Some(id)) {
                return Err(PersistError::Conflict(format!(
                    "Company '{}' already exists",
                    name
                )));
            }
        }

        let company = companies
            .get_mut(id)
            .ok_or_else(|| PersistError::Internal("company vanished under lock".to_string()))?;
        update.apply(company, at);
        Ok(Some(company.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.companies.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryAgentRepository {
    agents: RwLock<HashMap<String, Agent>>,
}

fn agent_name_taken(
    agents: &HashMap<String, Agent>,
    company_id: &str,
    name: &str,
    except: Option<&str>,
) -> bool {
    agents.values().any(|a| {
        a.company_id == company_id && a.name == name && Some(a.id.as_str()) != except
    })
}

#[async_trait]
impl AgentRepository for MemoryAgentRepository {
    async fn create(&self, agent: NewAgent) -> Result<Agent> {
        let mut agents = self.agents.write().await;
        if agent_name_taken(&agents, &agent.company_id, &agent.name, None) {
            return Err(PersistError::Conflict(format!(
                "Agent '{}' already exists in this company",
                agent.name
            )));
        }

        let agent = Agent {
            id: new_id(),
            name: agent.name,
            description: agent.description,
            company_id: agent.company_id,
            created_at: agent.created_at,
            updated_at: agent.created_at,
        };
        agents.insert(agent.id.clone(), agent.clone());
        Ok(agent)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Agent>> {
        Ok(self.agents.read().await.get(id).cloned())
    }

    async fn list_by_companies(&self, company_ids: &[String]) -> Result<Vec<Agent>> {
        let agents = self.agents.read().await;
        let mut found: Vec<Agent> = agents
            .values()
            .filter(|a| company_ids.contains(&a.company_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update(
        &self,
        id: &str,
        update: AgentUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Agent>> {
        let mut agents = self.agents.write().await;
        let current = match agents.get(id) {
            Some(agent) => agent.clone(),
            None => return Ok(None),
        };

        let company_id = update.company_id.as_deref().unwrap_or(&current.company_id);
        let name = update.name.as_deref().unwrap_or(&current.name);
        if agent_name_taken(&agents, company_id, name, Some(id)) {
            return Err(PersistError::Conflict(format!(
                "Agent '{}' already exists in this company",
                name
            )));
        }

        let agent = agents
            .get_mut(id)
            .ok_or_else(|| PersistError::Internal("agent vanished under lock".to_string()))?;
        update.apply(agent, at);
        Ok(Some(agent.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.agents.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryContactRepository {
    contacts: RwLock<HashMap<String, Contact>>,
}

impl MemoryContactRepository {
    async fn first_matching(&self, pred: impl Fn(&Contact) -> bool) -> Option<Contact> {
        let contacts = self.contacts.read().await;
        contacts
            .values()
            .filter(|c| pred(c))
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
            .cloned()
    }

    pub async fn count(&self) -> usize {
        self.contacts.read().await.len()
    }
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn create(&self, contact: NewContact) -> Result<Contact> {
        let contact = Contact {
            id: new_id(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            created_at: contact.created_at,
            updated_at: contact.created_at,
        };
        self.contacts
            .write()
            .await
            .insert(contact.id.clone(), contact.clone());
        Ok(contact)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>> {
        Ok(self.contacts.read().await.get(id).cloned())
    }

    async fn find_first_by_phone(&self, phone: &str) -> Result<Option<Contact>> {
        Ok(self
            .first_matching(|c| c.phone.as_deref() == Some(phone))
            .await)
    }

    async fn find_first_by_email(&self, email: &str) -> Result<Option<Contact>> {
        Ok(self
            .first_matching(|c| c.email.as_deref() == Some(email))
            .await)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.contacts.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryThreadRepository {
    threads: RwLock<HashMap<String, Thread>>,
}

impl MemoryThreadRepository {
    pub async fn count(&self) -> usize {
        self.threads.read().await.len()
    }
}

#[async_trait]
impl ThreadRepository for MemoryThreadRepository {
    async fn create(&self, thread: NewThread) -> Result<Thread> {
        let thread = Thread {
            id: new_id(),
            contact_id: thread.contact_id,
            agent_id: thread.agent_id,
            name: thread.name,
            origin: thread.origin,
            created_at: thread.created_at,
            updated_at: thread.created_at,
        };
        self.threads
            .write()
            .await
            .insert(thread.id.clone(), thread.clone());
        Ok(thread)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Thread>> {
        Ok(self.threads.read().await.get(id).cloned())
    }

    async fn find_latest_since(
        &self,
        contact_id: &str,
        agent_id: &str,
        origin: Origin,
        since: DateTime<Utc>,
    ) -> Result<Option<Thread>> {
        let threads = self.threads.read().await;
        Ok(threads
            .values()
            .filter(|t| {
                t.contact_id == contact_id
                    && t.agent_id == agent_id
                    && t.origin == origin
                    && t.created_at >= since
            })
            .max_by(|a, b| a.created_at.cmp(&b.created_at))
            .cloned())
    }

    async fn list_by_agent(&self, agent_id: &str) -> Result<Vec<Thread>> {
        let threads = self.threads.read().await;
        let mut found: Vec<Thread> = threads
            .values()
            .filter(|t| t.agent_id == agent_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn exists_for_contact(&self, contact_id: &str) -> Result<bool> {
        let threads = self.threads.read().await;
        Ok(threads.values().any(|t| t.contact_id == contact_id))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.threads.write().await.remove(id).is_some())
    }

    async fn delete_by_agent(&self, agent_id: &str) -> Result<u64> {
        let mut threads = self.threads.write().await;
        let before = threads.len();
        threads.retain(|_, t| t.agent_id != agent_id);
        Ok((before - threads.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryMessageRepository {
    messages: RwLock<HashMap<String, Message>>,
}

impl MemoryMessageRepository {
    pub async fn count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        let message = Message {
            id: new_id(),
            thread_id: message.thread_id,
            role: message.role,
            content: message.content,
            created_at: message.created_at,
            updated_at: message.created_at,
        };
        self.messages
            .write()
            .await
            .insert(message.id.clone(), message.clone());
        Ok(message)
    }

    async fn list_by_thread(&self, thread_id: &str) -> Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<Message> = messages
            .values()
            .filter(|m| m.thread_id == thread_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.messages.write().await.remove(id).is_some())
    }

    async fn delete_by_threads(&self, thread_ids: &[String]) -> Result<u64> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|_, m| !thread_ids.contains(&m.thread_id));
        Ok((before - messages.len()) as u64)
    }
}
