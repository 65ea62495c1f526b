// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Static blog content served alongside the newsletter endpoint.

use serde::Serialize;

/// A blog article. Content is Markdown.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub image: &'static str,
    pub excerpt: &'static str,
    pub content: &'static str,
    /// Estimated reading time in minutes
    pub read_time: u32,
}

static POSTS: &[BlogPost] = &[
    BlogPost {
        slug: "manter-corte-perfeito",
        title: "Como manter o corte perfeito por mais tempo",
        category: "Cabelo",
        image: "/images/icons/tesoura_icon.png",
        excerpt: "Dicas essenciais para preservar seu corte entre as visitas à barbearia.",
        read_time: 4,
        content: "Com alguns cuidados simples é possível prolongar a vida do seu corte por semanas.

## 1. Lave o cabelo com a frequência certa

Lavar todos os dias remove os óleos naturais dos fios. O ideal é lavar de 2 a 3 vezes por semana.

## 2. Use os produtos certos

Uma pomada, cera ou pasta de qualidade mantém o formato do corte ao longo do dia.

## 3. Visite seu barbeiro regularmente

O ideal é voltar à barbearia a cada 3 a 4 semanas para manter o formato sem cortar demais.",
    },
    BlogPost {
        slug: "cuidados-diarios-barba",
        title: "Cuidados diários com a barba",
        category: "Barba",
        image: "/images/icons/navalha_icon.png",
        excerpt: "Os melhores produtos e técnicas para uma barba sempre impecável.",
        read_time: 5,
        content: "Uma barba bem cuidada exige uma rotina diária. Confira as dicas essenciais:

## 1. Higienize a barba

Use um shampoo específico para barba de 2 a 3 vezes por semana e água morna nos outros dias.

## 2. Hidrate com óleo para barba

Aplique de 3 a 5 gotas após o banho, massageando até a raiz, para evitar coceira e caspa.

## 3. Penteie todos os dias

Um pente de madeira distribui o óleo e treina os fios a crescerem na direção correta.",
    },
    BlogPost {
        slug: "importancia-barboterapia",
        title: "A importância da barboterapia",
        category: "Tratamento",
        image: "/images/icons/barba_espuma.png",
        excerpt: "Descubra por que esse tratamento é essencial para a saúde da sua pele.",
        read_time: 4,
        content: "A barboterapia une o barbear tradicional a um ritual de cuidado com a pele.

## 1. Toalha quente

O vapor abre os poros e amolece os fios, tornando o barbear mais suave e evitando irritações.

## 2. Esfoliação e hidratação

Remove células mortas, previne pelos encravados e devolve a hidratação natural da pele.

## 3. Momento de relaxamento

Além da estética, o ritual é uma pausa na rotina. Agende a sua sessão na barbearia.",
    },
];

/// Look up a post by slug.
pub fn get_post(slug: &str) -> Option<&'static BlogPost> {
    POSTS.iter().find(|post| post.slug == slug)
}

/// Slugs of every published post.
pub fn list_slugs() -> Vec<&'static str> {
    POSTS.iter().map(|post| post.slug).collect()
}

pub fn all_posts() -> &'static [BlogPost] {
    POSTS
}
